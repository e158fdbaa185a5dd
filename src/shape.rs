use crate::{
    common::{Node, NodeType},
    OffmarkError,
};

#[derive(Debug, Clone, Default, PartialEq)]
/// A contour in a glyph outline
pub struct Path {
    /// A list of nodes in the path
    pub nodes: Vec<Node>,
    /// Whether the path is closed
    pub closed: bool,
}

impl Path {
    /// A closed path made only of straight lines between the given points
    pub fn from_points(points: impl IntoIterator<Item = kurbo::Point>) -> Self {
        Path {
            nodes: points.into_iter().map(Node::from).collect(),
            closed: true,
        }
    }

    /// Converts the `Path` to a [`kurbo::BezPath`].
    pub fn to_kurbo(&self) -> Result<kurbo::BezPath, OffmarkError> {
        let mut path = kurbo::BezPath::new();
        let mut offs = std::collections::VecDeque::new();
        let rotate = if self.closed {
            self.nodes
                .iter()
                .rev()
                .position(|pt| pt.nodetype != NodeType::OffCurve)
                .map(|idx| self.nodes.len() - 1 - idx)
                .unwrap_or(0)
        } else {
            0
        };
        let mut nodes = self
            .nodes
            .iter()
            .cycle()
            .skip(rotate)
            .take(self.nodes.len());
        // All kurbo paths (even closed ones) must start with a move_to
        if let Some(start) = nodes.next() {
            path.move_to(start.to_kurbo());
        } else {
            return Ok(path);
        }
        for pt in nodes {
            let kurbo_point = pt.to_kurbo();
            match pt.nodetype {
                NodeType::Move => path.move_to(kurbo_point),
                NodeType::Line => path.line_to(kurbo_point),
                NodeType::OffCurve => offs.push_back(kurbo_point),
                NodeType::Curve => {
                    match offs.make_contiguous() {
                        [] => return Err(OffmarkError::BadPath),
                        [p1] => path.quad_to(*p1, kurbo_point),
                        [p1, p2] => path.curve_to(*p1, *p2, kurbo_point),
                        _ => return Err(OffmarkError::BadPath),
                    };
                    offs.clear();
                }
                NodeType::QCurve => {
                    while let Some(pt) = offs.pop_front() {
                        if let Some(next) = offs.front() {
                            let implied_point = pt.midpoint(*next);
                            path.quad_to(pt, implied_point);
                        } else {
                            path.quad_to(pt, kurbo_point);
                        }
                    }
                }
            }
        }
        // Trailing off-curves of a closed contour curve back to the start
        if self.closed && !offs.is_empty() {
            let start_node = self.nodes.get(rotate).ok_or(OffmarkError::BadPath)?;
            let start = start_node.to_kurbo();
            let trailing: Vec<kurbo::Point> = offs.drain(..).collect();
            match (start_node.nodetype, trailing.as_slice()) {
                (NodeType::Curve, [p1, p2]) => path.curve_to(*p1, *p2, start),
                (NodeType::Curve, [p1]) => path.quad_to(*p1, start),
                (NodeType::Curve, _) => return Err(OffmarkError::BadPath),
                _ => {
                    for (ix, pt) in trailing.iter().enumerate() {
                        let end = trailing
                            .get(ix + 1)
                            .map(|next| pt.midpoint(*next))
                            .unwrap_or(start);
                        path.quad_to(*pt, end);
                    }
                }
            }
        }
        if self.closed {
            path.close_path()
        }
        Ok(path)
    }
}

/// Converts a list of paths into a single [`kurbo::BezPath`]
pub fn paths_to_kurbo(paths: &[Path]) -> Result<kurbo::BezPath, OffmarkError> {
    let mut bez = kurbo::BezPath::new();
    for path in paths {
        bez.extend(path.to_kurbo()?);
    }
    Ok(bez)
}

/// Interface for accepting a sequence of path commands.
pub trait OutlinePen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f32, y: f32);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f32, y: f32);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// A pen which builds paths
///
/// ```rust
/// use offmark::{OutlinePen, PathBuilder};
/// let mut pen = PathBuilder::new();
/// pen.move_to(0.0, 0.0);
/// pen.line_to(100.0, 0.0);
/// pen.line_to(100.0, 100.0);
/// pen.close();
/// let paths = pen.build();
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].nodes.len(), 3);
/// assert!(paths[0].closed);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    paths: Vec<Path>,
    current_path: Option<Path>,
}

impl PathBuilder {
    /// Create a new PathBuilder
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            current_path: None,
        }
    }

    /// Build and return the paths, dropping any that ended up empty
    pub fn build(self) -> Vec<Path> {
        let mut paths = self.paths;
        if let Some(path) = self.current_path {
            paths.push(path);
        }
        paths.retain(|p| !p.nodes.is_empty());
        paths
    }

    fn current_path_mut(&mut self) -> &mut Path {
        self.current_path.get_or_insert_with(Path::default)
    }
}

impl OutlinePen for PathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        if let Some(path) = self.current_path.take() {
            self.paths.push(path);
        }
        self.current_path_mut().nodes.push(Node::new_move(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.current_path_mut().nodes.push(Node::new_line(x, y));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let path = self.current_path_mut();
        path.nodes.push(Node::new_offcurve(cx0, cy0));
        path.nodes.push(Node::new_qcurve(x, y));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let path = self.current_path_mut();
        path.nodes.push(Node::new_offcurve(cx0, cy0));
        path.nodes.push(Node::new_offcurve(cx1, cy1));
        path.nodes.push(Node::new_curve(x, y));
    }

    fn close(&mut self) {
        if let Some(mut path) = self.current_path.take() {
            path.closed = true;
            // A closed path has no move. If the final node brought us back to
            // the start point, drop the first node; otherwise it becomes a line.
            if let (Some(first), Some(last)) = (path.nodes.first(), path.nodes.last()) {
                if path.nodes.len() > 1 && first.x == last.x && first.y == last.y {
                    path.nodes.remove(0);
                } else if let Some(first) = path.nodes.first_mut() {
                    first.nodetype = NodeType::Line;
                }
            }
            self.paths.push(path);
        }
    }
}
