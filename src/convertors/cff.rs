//! Rewriting `CFF ` and `CFF2` tables with replacement charstrings.
//!
//! Every structure reachable from the Top DICT is carried over byte for byte
//! and laid out again, so only the offsets change. Charstrings of glyphs
//! that were not edited are copied untouched, subroutine calls included.

use crate::OffmarkError;
use kurbo::{BezPath, PathEl, Point};
use std::collections::BTreeMap;

const CHARSET: u16 = 15;
const ENCODING: u16 = 16;
const CHARSTRINGS: u16 = 17;
const PRIVATE: u16 = 18;
const SUBRS: u16 = 19;
const VSTORE: u16 = 24;
const FD_ARRAY: u16 = 0x0c00 | 36;
const FD_SELECT: u16 = 0x0c00 | 37;

// Type 2 charstring operators
const RLINETO: u8 = 5;
const RRCURVETO: u8 = 8;
const ENDCHAR: u8 = 14;
const RMOVETO: u8 = 21;

fn malformed(what: &str) -> OffmarkError {
    OffmarkError::Malformed(format!("CFF: {}", what))
}

/// Big-endian cursor over table data
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Reader { data, pos }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], OffmarkError> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or_else(|| malformed("offset overflow"))?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| malformed("unexpected end of table"))?;
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, OffmarkError> {
        Ok(self.take(1)?[0])
    }

    fn uint(&mut self, size: usize) -> Result<u32, OffmarkError> {
        Ok(self
            .take(size)?
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
    }

    fn u16(&mut self) -> Result<u16, OffmarkError> {
        Ok(self.uint(2)? as u16)
    }

    fn u32(&mut self) -> Result<u32, OffmarkError> {
        self.uint(4)
    }
}

/// CFF2 widened the INDEX count to 32 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexFormat {
    Cff,
    Cff2,
}

#[derive(Debug)]
struct Index<'a> {
    items: Vec<&'a [u8]>,
    /// The encoded size of the whole INDEX
    len: usize,
}

fn read_index(data: &[u8], start: usize, format: IndexFormat) -> Result<Index<'_>, OffmarkError> {
    let mut reader = Reader::new(data, start);
    let count = match format {
        IndexFormat::Cff => reader.u16()? as usize,
        IndexFormat::Cff2 => reader.u32()? as usize,
    };
    if count == 0 {
        return Ok(Index {
            items: vec![],
            len: reader.pos - start,
        });
    }
    let off_size = reader.u8()? as usize;
    if !(1..=4).contains(&off_size) {
        return Err(malformed("bad INDEX offset size"));
    }
    let offsets = (0..=count)
        .map(|_| reader.uint(off_size).map(|o| o as usize))
        .collect::<Result<Vec<_>, _>>()?;
    // Offsets count from the byte before the object data
    let base = reader.pos - 1;
    let mut items = Vec::with_capacity(count);
    for pair in offsets.windows(2) {
        if pair[0] == 0 || pair[0] > pair[1] {
            return Err(malformed("bad INDEX offsets"));
        }
        items.push(
            data.get(base + pair[0]..base + pair[1])
                .ok_or_else(|| malformed("INDEX data out of bounds"))?,
        );
    }
    let last = offsets.last().copied().unwrap_or(1);
    Ok(Index {
        items,
        len: base + last - start,
    })
}

fn write_index<T: AsRef<[u8]>>(items: &[T], format: IndexFormat) -> Vec<u8> {
    let mut out = vec![];
    match format {
        IndexFormat::Cff => out.extend((items.len() as u16).to_be_bytes()),
        IndexFormat::Cff2 => out.extend((items.len() as u32).to_be_bytes()),
    }
    if items.is_empty() {
        return out;
    }
    let last = 1 + items.iter().map(|i| i.as_ref().len()).sum::<usize>();
    let off_size = if last <= 0xff {
        1
    } else if last <= 0xffff {
        2
    } else if last <= 0xff_ffff {
        3
    } else {
        4
    };
    out.push(off_size as u8);
    let mut offset = 1;
    out.extend_from_slice(&(offset as u32).to_be_bytes()[4 - off_size..]);
    for item in items {
        offset += item.as_ref().len();
        out.extend_from_slice(&(offset as u32).to_be_bytes()[4 - off_size..]);
    }
    for item in items {
        out.extend_from_slice(item.as_ref());
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Int(i32),
    /// Always written in the five-byte form, so its size does not depend on its value
    Offset(i32),
    /// A real number in its original nibble encoding, `30` prefix included
    Real(Vec<u8>),
}

impl Operand {
    fn value(&self) -> Result<usize, OffmarkError> {
        match self {
            Operand::Int(v) | Operand::Offset(v) => {
                usize::try_from(*v).map_err(|_| malformed("negative offset"))
            }
            Operand::Real(_) => Err(malformed("real number where an offset was expected")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DictEntry {
    op: u16,
    operands: Vec<Operand>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Dict(Vec<DictEntry>);

impl Dict {
    fn parse(data: &[u8]) -> Result<Self, OffmarkError> {
        let mut entries = vec![];
        let mut operands = vec![];
        let mut reader = Reader::new(data, 0);
        while reader.pos < data.len() {
            let b0 = reader.u8()?;
            match b0 {
                12 => {
                    let op = 0x0c00 | u16::from(reader.u8()?);
                    entries.push(DictEntry {
                        op,
                        operands: std::mem::take(&mut operands),
                    });
                }
                0..=24 => entries.push(DictEntry {
                    op: u16::from(b0),
                    operands: std::mem::take(&mut operands),
                }),
                28 => operands.push(Operand::Int(i32::from(reader.u16()? as i16))),
                29 => operands.push(Operand::Int(reader.u32()? as i32)),
                30 => {
                    let start = reader.pos - 1;
                    loop {
                        let byte = reader.u8()?;
                        if byte & 0x0f == 0x0f || byte >> 4 == 0x0f {
                            break;
                        }
                    }
                    operands.push(Operand::Real(data[start..reader.pos].to_vec()));
                }
                32..=246 => operands.push(Operand::Int(i32::from(b0) - 139)),
                247..=250 => {
                    let b1 = i32::from(reader.u8()?);
                    operands.push(Operand::Int((i32::from(b0) - 247) * 256 + b1 + 108));
                }
                251..=254 => {
                    let b1 = i32::from(reader.u8()?);
                    operands.push(Operand::Int(-(i32::from(b0) - 251) * 256 - b1 - 108));
                }
                _ => return Err(malformed("reserved byte in DICT")),
            }
        }
        Ok(Dict(entries))
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = vec![];
        for entry in &self.0 {
            for operand in &entry.operands {
                match operand {
                    Operand::Int(v) => push_dict_int(&mut out, *v),
                    Operand::Offset(v) => {
                        out.push(29);
                        out.extend(v.to_be_bytes());
                    }
                    Operand::Real(bytes) => out.extend_from_slice(bytes),
                }
            }
            if entry.op > 0xff {
                out.extend(entry.op.to_be_bytes());
            } else {
                out.push(entry.op as u8);
            }
        }
        out
    }

    fn get(&self, op: u16) -> Option<&[Operand]> {
        self.0
            .iter()
            .find(|entry| entry.op == op)
            .map(|entry| entry.operands.as_slice())
    }

    /// The single offset operand of `op`, if present
    fn offset(&self, op: u16) -> Result<Option<usize>, OffmarkError> {
        match self.get(op) {
            None => Ok(None),
            Some([operand]) => operand.value().map(Some),
            Some(_) => Err(malformed("expected a single offset operand")),
        }
    }

    /// The `(size, offset)` pair of a Private entry
    fn private_range(&self) -> Result<Option<(usize, usize)>, OffmarkError> {
        match self.get(PRIVATE) {
            None => Ok(None),
            Some([size, offset]) => Ok(Some((size.value()?, offset.value()?))),
            Some(_) => Err(malformed("Private entry needs a size and an offset")),
        }
    }

    fn set(&mut self, op: u16, operands: Vec<Operand>) {
        match self.0.iter_mut().find(|entry| entry.op == op) {
            Some(entry) => entry.operands = operands,
            None => self.0.push(DictEntry { op, operands }),
        }
    }
}

fn push_dict_int(out: &mut Vec<u8>, v: i32) {
    match v {
        -107..=107 => out.push((v + 139) as u8),
        108..=1131 => {
            let v = v - 108;
            out.push((v >> 8) as u8 + 247);
            out.push((v & 0xff) as u8);
        }
        -1131..=-108 => {
            let v = -v - 108;
            out.push((v >> 8) as u8 + 251);
            out.push((v & 0xff) as u8);
        }
        -32768..=32767 => {
            out.push(28);
            out.extend((v as i16).to_be_bytes());
        }
        _ => {
            out.push(29);
            out.extend(v.to_be_bytes());
        }
    }
}

/// A Private DICT and the local subroutines it points at
#[derive(Debug, Clone)]
struct Private<'a> {
    dict: Dict,
    subrs: Option<&'a [u8]>,
}

impl<'a> Private<'a> {
    fn read(
        table: &'a [u8],
        (size, offset): (usize, usize),
        format: IndexFormat,
    ) -> Result<Self, OffmarkError> {
        let dict = Dict::parse(Reader::new(table, offset).take(size)?)?;
        let subrs = match dict.offset(SUBRS)? {
            Some(relative) => {
                let start = offset + relative;
                let index = read_index(table, start, format)?;
                Some(Reader::new(table, start).take(index.len)?)
            }
            None => None,
        };
        Ok(Private { dict, subrs })
    }

    /// The DICT followed directly by its subroutines, and the DICT's size
    fn encode(&self) -> (Vec<u8>, usize) {
        let mut dict = self.dict.clone();
        if self.subrs.is_some() {
            dict.set(SUBRS, vec![Operand::Offset(0)]);
            let size = dict.encode().len();
            dict.set(SUBRS, vec![Operand::Offset(size as i32)]);
        }
        let mut out = dict.encode();
        let size = out.len();
        if let Some(subrs) = self.subrs {
            out.extend_from_slice(subrs);
        }
        (out, size)
    }
}

/// A Font DICT from a CID-keyed or CFF2 FDArray
#[derive(Debug, Clone)]
struct FontDict<'a> {
    dict: Dict,
    private: Option<Private<'a>>,
}

/// Everything in a CFF or CFF2 table, with offset-addressed data split out
struct Table<'a> {
    format: IndexFormat,
    header: Vec<u8>,
    /// Name INDEX (CFF only)
    names: &'a [u8],
    /// String INDEX (CFF only)
    strings: &'a [u8],
    global_subrs: &'a [u8],
    top: Dict,
    charset: Option<&'a [u8]>,
    encoding: Option<&'a [u8]>,
    fd_select: Option<&'a [u8]>,
    vstore: Option<&'a [u8]>,
    charstrings: Vec<&'a [u8]>,
    private: Option<Private<'a>>,
    fd_array: Option<Vec<FontDict<'a>>>,
}

impl<'a> Table<'a> {
    fn read(table: &'a [u8]) -> Result<Self, OffmarkError> {
        let mut reader = Reader::new(table, 0);
        let major = reader.u8()?;
        let _minor = reader.u8()?;
        let header_size = reader.u8()? as usize;
        if header_size < 4 + usize::from(major == 2) {
            return Err(malformed("header too short"));
        }
        let (format, top, names, strings, global_start) = match major {
            1 => {
                let names = read_index(table, header_size, IndexFormat::Cff)?;
                let top_start = header_size + names.len;
                let tops = read_index(table, top_start, IndexFormat::Cff)?;
                let [top] = tops.items.as_slice() else {
                    return Err(malformed("only single-font tables are supported"));
                };
                let strings_start = top_start + tops.len;
                let strings = read_index(table, strings_start, IndexFormat::Cff)?;
                (
                    IndexFormat::Cff,
                    Dict::parse(top)?,
                    Reader::new(table, header_size).take(names.len)?,
                    Reader::new(table, strings_start).take(strings.len)?,
                    strings_start + strings.len,
                )
            }
            2 => {
                let top_size = reader.u16()? as usize;
                let top = Reader::new(table, header_size).take(top_size)?;
                (
                    IndexFormat::Cff2,
                    Dict::parse(top)?,
                    &table[..0],
                    &table[..0],
                    header_size + top_size,
                )
            }
            _ => return Err(malformed("unknown major version")),
        };
        let header = Reader::new(table, 0).take(header_size)?.to_vec();
        let global = read_index(table, global_start, format)?;
        let global_subrs = Reader::new(table, global_start).take(global.len)?;

        let charstrings_start = top
            .offset(CHARSTRINGS)?
            .ok_or_else(|| malformed("no CharStrings"))?;
        let charstrings = read_index(table, charstrings_start, format)?.items;
        let num_glyphs = charstrings.len();

        let slice = |offset: usize, len: usize| Reader::new(table, offset).take(len);
        // Values below these are predefined charsets and encodings
        let charset = match top.offset(CHARSET)? {
            Some(offset) if offset > 2 && format == IndexFormat::Cff => {
                Some(slice(offset, charset_len(table, offset, num_glyphs)?)?)
            }
            _ => None,
        };
        let encoding = match top.offset(ENCODING)? {
            Some(offset) if offset > 1 && format == IndexFormat::Cff => {
                Some(slice(offset, encoding_len(table, offset)?)?)
            }
            _ => None,
        };
        let fd_select = match top.offset(FD_SELECT)? {
            Some(offset) => Some(slice(offset, fd_select_len(table, offset, num_glyphs)?)?),
            None => None,
        };
        let vstore = match top.offset(VSTORE)? {
            Some(offset) => {
                let len = Reader::new(table, offset).u16()? as usize;
                Some(slice(offset, 2 + len)?)
            }
            None => None,
        };
        let private = match top.private_range()? {
            Some(range) => Some(Private::read(table, range, format)?),
            None => None,
        };
        let fd_array = match top.offset(FD_ARRAY)? {
            Some(offset) => Some(
                read_index(table, offset, format)?
                    .items
                    .into_iter()
                    .map(|item| {
                        let dict = Dict::parse(item)?;
                        let private = match dict.private_range()? {
                            Some(range) => Some(Private::read(table, range, format)?),
                            None => None,
                        };
                        Ok(FontDict { dict, private })
                    })
                    .collect::<Result<Vec<_>, OffmarkError>>()?,
            ),
            None => None,
        };

        Ok(Table {
            format,
            header,
            names,
            strings,
            global_subrs,
            top,
            charset,
            encoding,
            fd_select,
            vstore,
            charstrings,
            private,
            fd_array,
        })
    }

    fn write(&self) -> Result<Vec<u8>, OffmarkError> {
        let charstrings = write_index(&self.charstrings, self.format);
        let private = self.private.as_ref().map(Private::encode);
        let fd_privates: Vec<Option<(Vec<u8>, usize)>> = self
            .fd_array
            .iter()
            .flatten()
            .map(|fd| fd.private.as_ref().map(Private::encode))
            .collect();

        // First pass with placeholder offsets. Every offset is fixed-width, so
        // the sizes stay the same once the real values are filled in.
        let mut top = self.top.clone();
        let mut font_dicts: Vec<Dict> = self
            .fd_array
            .iter()
            .flatten()
            .map(|fd| fd.dict.clone())
            .collect();
        let mut layout = Layout {
            charset: self.charset.map(|_| 0),
            encoding: self.encoding.map(|_| 0),
            fd_select: self.fd_select.map(|_| 0),
            vstore: self.vstore.map(|_| 0),
            charstrings: 0,
            fd_array: self.fd_array.as_ref().map(|_| 0),
            private: private.as_ref().map(|_| 0),
            fd_privates: fd_privates.iter().map(|p| p.as_ref().map(|_| 0)).collect(),
        };
        layout.apply(&mut top, &mut font_dicts, &private, &fd_privates);
        let top_block_len = self.top_block(&top).len();
        let fd_array_len = self
            .fd_array
            .as_ref()
            .map(|_| write_index(&encode_all(&font_dicts), self.format).len());

        let mut pos = self.header.len()
            + self.names.len()
            + top_block_len
            + self.strings.len()
            + self.global_subrs.len();
        let mut place = |len: usize| {
            let at = pos;
            pos += len;
            i32::try_from(at).map_err(|_| malformed("table too large"))
        };
        layout.charset = self.charset.map(|c| place(c.len())).transpose()?;
        layout.encoding = self.encoding.map(|e| place(e.len())).transpose()?;
        layout.fd_select = self.fd_select.map(|f| place(f.len())).transpose()?;
        layout.vstore = self.vstore.map(|v| place(v.len())).transpose()?;
        layout.charstrings = place(charstrings.len())?;
        layout.fd_array = fd_array_len.map(&mut place).transpose()?;
        layout.private = private
            .as_ref()
            .map(|(bytes, _)| place(bytes.len()))
            .transpose()?;
        layout.fd_privates = fd_privates
            .iter()
            .map(|p| p.as_ref().map(|(bytes, _)| place(bytes.len())).transpose())
            .collect::<Result<_, _>>()?;
        layout.apply(&mut top, &mut font_dicts, &private, &fd_privates);

        let top_block = self.top_block(&top);
        if top_block.len() != top_block_len {
            return Err(malformed("Top DICT changed size during layout"));
        }
        let mut header = self.header.clone();
        match self.format {
            // Absolute offsets are now all four bytes wide
            IndexFormat::Cff => header[3] = 4,
            IndexFormat::Cff2 => {
                let size = u16::try_from(top_block.len())
                    .map_err(|_| malformed("Top DICT too large"))?;
                header[3..5].copy_from_slice(&size.to_be_bytes());
            }
        }

        let mut out = header;
        out.extend_from_slice(self.names);
        out.extend(top_block);
        out.extend_from_slice(self.strings);
        out.extend_from_slice(self.global_subrs);
        for block in [self.charset, self.encoding, self.fd_select, self.vstore]
            .into_iter()
            .flatten()
        {
            out.extend_from_slice(block);
        }
        out.extend(charstrings);
        if self.fd_array.is_some() {
            out.extend(write_index(&encode_all(&font_dicts), self.format));
        }
        for (bytes, _) in private.iter().chain(fd_privates.iter().flatten()) {
            out.extend_from_slice(bytes);
        }
        Ok(out)
    }

    /// CFF wraps the Top DICT in a one-element INDEX; CFF2 stores it bare
    fn top_block(&self, top: &Dict) -> Vec<u8> {
        match self.format {
            IndexFormat::Cff => write_index(&[top.encode()], IndexFormat::Cff),
            IndexFormat::Cff2 => top.encode(),
        }
    }
}

fn encode_all(dicts: &[Dict]) -> Vec<Vec<u8>> {
    dicts.iter().map(Dict::encode).collect()
}

/// Where each offset-addressed structure lands in the rewritten table
#[derive(Debug)]
struct Layout {
    charset: Option<i32>,
    encoding: Option<i32>,
    fd_select: Option<i32>,
    vstore: Option<i32>,
    charstrings: i32,
    fd_array: Option<i32>,
    private: Option<i32>,
    fd_privates: Vec<Option<i32>>,
}

impl Layout {
    fn apply(
        &self,
        top: &mut Dict,
        font_dicts: &mut [Dict],
        private: &Option<(Vec<u8>, usize)>,
        fd_privates: &[Option<(Vec<u8>, usize)>],
    ) {
        for (op, value) in [
            (CHARSET, self.charset),
            (ENCODING, self.encoding),
            (FD_SELECT, self.fd_select),
            (VSTORE, self.vstore),
            (FD_ARRAY, self.fd_array),
            (CHARSTRINGS, Some(self.charstrings)),
        ] {
            if let Some(at) = value {
                top.set(op, vec![Operand::Offset(at)]);
            }
        }
        if let (Some((_, size)), Some(at)) = (private, self.private) {
            top.set(PRIVATE, vec![Operand::Offset(*size as i32), Operand::Offset(at)]);
        }
        let placed = font_dicts.iter_mut().zip(fd_privates).zip(&self.fd_privates);
        for ((dict, fd_private), at) in placed {
            if let (Some((_, size)), Some(at)) = (fd_private, at) {
                dict.set(PRIVATE, vec![Operand::Offset(*size as i32), Operand::Offset(*at)]);
            }
        }
    }
}

fn charset_len(table: &[u8], offset: usize, num_glyphs: usize) -> Result<usize, OffmarkError> {
    let mut reader = Reader::new(table, offset);
    let remaining = num_glyphs.saturating_sub(1);
    match reader.u8()? {
        0 => {
            reader.take(remaining * 2)?;
        }
        format @ (1 | 2) => {
            let mut covered = 0;
            while covered < remaining {
                reader.u16()?;
                let left = if format == 1 {
                    reader.u8()? as usize
                } else {
                    reader.u16()? as usize
                };
                covered += left + 1;
            }
        }
        _ => return Err(malformed("unknown charset format")),
    }
    Ok(reader.pos - offset)
}

fn encoding_len(table: &[u8], offset: usize) -> Result<usize, OffmarkError> {
    let mut reader = Reader::new(table, offset);
    let format = reader.u8()?;
    match format & 0x7f {
        0 => {
            let codes = reader.u8()? as usize;
            reader.take(codes)?;
        }
        1 => {
            let ranges = reader.u8()? as usize;
            reader.take(ranges * 2)?;
        }
        _ => return Err(malformed("unknown encoding format")),
    }
    if format & 0x80 != 0 {
        let supplements = reader.u8()? as usize;
        reader.take(supplements * 3)?;
    }
    Ok(reader.pos - offset)
}

fn fd_select_len(table: &[u8], offset: usize, num_glyphs: usize) -> Result<usize, OffmarkError> {
    let mut reader = Reader::new(table, offset);
    match reader.u8()? {
        0 => {
            reader.take(num_glyphs)?;
        }
        3 => {
            let ranges = reader.u16()? as usize;
            reader.take(ranges * 3 + 2)?;
        }
        4 => {
            let ranges = reader.u32()? as usize;
            reader.take(ranges * 6 + 4)?;
        }
        _ => return Err(malformed("unknown FDSelect format")),
    }
    Ok(reader.pos - offset)
}

/// Rewrite a `CFF ` or `CFF2` table, swapping in new charstrings by glyph id
pub(crate) fn replace_charstrings(
    table: &[u8],
    replacements: &BTreeMap<u32, Vec<u8>>,
) -> Result<Vec<u8>, OffmarkError> {
    let mut parsed = Table::read(table)?;
    for (&gid, charstring) in replacements {
        let slot = parsed
            .charstrings
            .get_mut(gid as usize)
            .ok_or_else(|| malformed("glyph id beyond CharStrings"))?;
        *slot = charstring.as_slice();
    }
    parsed.write()
}

/// Encode an outline as a Type 2 charstring. Coordinates are rounded to
/// integers; CFF2 charstrings carry no width and no `endchar`.
pub(crate) fn charstring(path: &BezPath, cff2: bool) -> Vec<u8> {
    let mut out = vec![];
    let mut current = (0, 0);
    let round = |p: Point| (p.x.round() as i32, p.y.round() as i32);
    let mut push_deltas = |out: &mut Vec<u8>, points: &[Point]| {
        for &p in points {
            let p = round(p);
            push_charstring_int(out, p.0 - current.0);
            push_charstring_int(out, p.1 - current.1);
            current = p;
        }
    };
    let mut last = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                push_deltas(&mut out, &[p]);
                out.push(RMOVETO);
                last = p;
            }
            PathEl::LineTo(p) => {
                push_deltas(&mut out, &[p]);
                out.push(RLINETO);
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                let c1 = last + (p1 - last) * (2.0 / 3.0);
                let c2 = p2 + (p1 - p2) * (2.0 / 3.0);
                push_deltas(&mut out, &[c1, c2, p2]);
                out.push(RRCURVETO);
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                push_deltas(&mut out, &[p1, p2, p3]);
                out.push(RRCURVETO);
                last = p3;
            }
            // Contours close implicitly at the next moveto or the end
            PathEl::ClosePath => {}
        }
    }
    if !cff2 {
        out.push(ENDCHAR);
    }
    out
}

fn push_charstring_int(out: &mut Vec<u8>, v: i32) {
    match v {
        -107..=107 => out.push((v + 139) as u8),
        108..=1131 => {
            let v = v - 108;
            out.push((v >> 8) as u8 + 247);
            out.push((v & 0xff) as u8);
        }
        -1131..=-108 => {
            let v = -v - 108;
            out.push((v >> 8) as u8 + 251);
            out.push((v & 0xff) as u8);
        }
        _ => {
            out.push(28);
            out.extend((v.clamp(i16::MIN.into(), i16::MAX.into()) as i16).to_be_bytes());
        }
    }
}
