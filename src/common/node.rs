#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NodeType {
    Move,
    Line,
    OffCurve,
    Curve,
    QCurve,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub nodetype: NodeType,
}

impl Node {
    pub fn new_move(x: f32, y: f32) -> Self {
        Self::new(x, y, NodeType::Move)
    }

    pub fn new_line(x: f32, y: f32) -> Self {
        Self::new(x, y, NodeType::Line)
    }

    pub fn new_offcurve(x: f32, y: f32) -> Self {
        Self::new(x, y, NodeType::OffCurve)
    }

    pub fn new_curve(x: f32, y: f32) -> Self {
        Self::new(x, y, NodeType::Curve)
    }

    pub fn new_qcurve(x: f32, y: f32) -> Self {
        Self::new(x, y, NodeType::QCurve)
    }

    fn new(x: f32, y: f32, nodetype: NodeType) -> Self {
        Node {
            x: x as f64,
            y: y as f64,
            nodetype,
        }
    }

    pub fn to_kurbo(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl From<kurbo::Point> for Node {
    fn from(pt: kurbo::Point) -> Self {
        Node {
            x: pt.x,
            y: pt.y,
            nodetype: NodeType::Line,
        }
    }
}
