/// Rewriting of CFF and CFF2 outline tables
mod cff;
/// TrueType/OpenType binary convertor
pub mod sfnt;
