use crate::{shape::Path, OffmarkError};
use i_overlay::{
    core::{fill_rule::FillRule, overlay_rule::OverlayRule},
    float::single::SingleFloatOverlay,
};
use kurbo::{PathEl, Point};

type Contour = Vec<[f64; 2]>;

/// Boolean geometry over glyph outlines
pub trait BooleanOps {
    /// Merge overlapping and self-intersecting contours into a clean set
    fn remove_overlap(&self, paths: &[Path]) -> Result<Vec<Path>, OffmarkError>;

    /// The area covered by `subject` but not by `clip`
    fn exclude(&self, subject: &[Path], clip: &[Path]) -> Result<Vec<Path>, OffmarkError>;
}

/// Polygon boolean operations, flattening curves first
#[derive(Debug, Clone, Copy)]
pub struct Overlay {
    /// Maximum distance, in font units, between a curve and its flattening
    pub tolerance: f64,
}

impl Default for Overlay {
    fn default() -> Self {
        Overlay { tolerance: 0.1 }
    }
}

impl Overlay {
    fn flatten(&self, paths: &[Path]) -> Result<Vec<Contour>, OffmarkError> {
        let mut contours = vec![];
        for path in paths {
            let bez = path.to_kurbo()?;
            let mut current: Contour = vec![];
            kurbo::flatten(bez, self.tolerance, |el| match el {
                PathEl::MoveTo(p) => {
                    if current.len() > 2 {
                        contours.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push([p.x, p.y]);
                }
                PathEl::LineTo(p) => current.push([p.x, p.y]),
                PathEl::ClosePath => {
                    if current.len() > 2 {
                        contours.push(std::mem::take(&mut current));
                    }
                    current.clear();
                }
                // flatten only emits moves, lines and closes
                PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
            });
            if current.len() > 2 {
                contours.push(current);
            }
        }
        Ok(contours)
    }

    fn run(
        &self,
        subject: &[Path],
        clip: &[Path],
        rule: OverlayRule,
    ) -> Result<Vec<Path>, OffmarkError> {
        let subject = self.flatten(subject)?;
        let clip = self.flatten(clip)?;
        let shapes: Vec<Vec<Contour>> = subject.overlay(&clip, rule, FillRule::NonZero);
        Ok(shapes_to_paths(shapes))
    }
}

impl BooleanOps for Overlay {
    fn remove_overlap(&self, paths: &[Path]) -> Result<Vec<Path>, OffmarkError> {
        self.run(paths, &[], OverlayRule::Subject)
    }

    fn exclude(&self, subject: &[Path], clip: &[Path]) -> Result<Vec<Path>, OffmarkError> {
        self.run(subject, clip, OverlayRule::Difference)
    }
}

/// Twice the signed area; positive when counter-clockwise in a y-up space
fn signed_area2(contour: &[[f64; 2]]) -> f64 {
    contour
        .iter()
        .zip(contour.iter().cycle().skip(1))
        .map(|(a, b)| a[0] * b[1] - b[0] * a[1])
        .sum()
}

/// Each shape is an outer contour followed by its holes. Outer contours are
/// wound clockwise and holes counter-clockwise, as TrueType expects.
fn shapes_to_paths(shapes: Vec<Vec<Contour>>) -> Vec<Path> {
    let mut paths = vec![];
    for shape in shapes {
        for (ix, mut contour) in shape.into_iter().enumerate() {
            if contour.len() < 3 {
                continue;
            }
            let clockwise = signed_area2(&contour) < 0.0;
            let is_outer = ix == 0;
            if clockwise != is_outer {
                contour.reverse();
            }
            paths.push(Path::from_points(
                contour.into_iter().map(|[x, y]| Point::new(x, y)),
            ));
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::shape::paths_to_kurbo;
    use kurbo::{ParamCurveArclen, Shape};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
        Path::from_points([
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    fn area(paths: &[Path]) -> f64 {
        paths_to_kurbo(paths).unwrap().area().abs()
    }

    #[test]
    fn overlapping_squares_merge() {
        let ops = Overlay::default();
        let merged = ops
            .remove_overlap(&[rect(0.0, 0.0, 100.0, 100.0), rect(50.0, 50.0, 150.0, 150.0)])
            .unwrap();
        assert_eq!(merged.len(), 1);
        assert!((area(&merged) - 17500.0).abs() < 1e-6);
    }

    #[test]
    fn exclude_cuts_a_hole() {
        let ops = Overlay::default();
        let result = ops
            .exclude(
                &[rect(0.0, 0.0, 100.0, 100.0)],
                &[rect(25.0, 25.0, 75.0, 75.0)],
            )
            .unwrap();
        assert_eq!(result.len(), 2);
        assert!((area(&result) - 7500.0).abs() < 1e-6);
    }

    #[test]
    fn outer_contours_are_clockwise() {
        let ops = Overlay::default();
        let result = ops
            .exclude(
                &[rect(0.0, 0.0, 100.0, 100.0)],
                &[rect(25.0, 25.0, 75.0, 75.0)],
            )
            .unwrap();
        let areas: Vec<f64> = result
            .iter()
            .map(|p| {
                let pts: Vec<[f64; 2]> = p.nodes.iter().map(|n| [n.x, n.y]).collect();
                signed_area2(&pts) / 2.0
            })
            .collect();
        assert!(areas.iter().any(|a| (a + 10000.0).abs() < 1e-6));
        assert!(areas.iter().any(|a| (a - 2500.0).abs() < 1e-6));
    }

    #[test]
    fn curves_are_flattened() {
        let mut pen = crate::PathBuilder::new();
        crate::OutlinePen::move_to(&mut pen, 0.0, 0.0);
        crate::OutlinePen::quad_to(&mut pen, 50.0, 100.0, 100.0, 0.0);
        crate::OutlinePen::close(&mut pen);
        let result = Overlay::default().remove_overlap(&pen.build()).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result[0].nodes.len() > 4);
        // Parabolic segment: 2/3 of base times peak height. The polyline is
        // inscribed, so it loses at most about tolerance times arc length.
        let exact = 100.0 * 50.0 * 2.0 / 3.0;
        let arc = kurbo::QuadBez::new((0.0, 0.0), (50.0, 100.0), (100.0, 0.0)).arclen(1e-6);
        let loss = exact - area(&result);
        assert!(loss >= 0.0, "flattened area {} exceeds the curve", area(&result));
        assert!(loss < Overlay::default().tolerance * arc, "lost {}", loss);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let ops = Overlay::default();
        assert!(ops.remove_overlap(&[]).unwrap().is_empty());
        assert!(ops
            .exclude(&[], &[rect(0.0, 0.0, 10.0, 10.0)])
            .unwrap()
            .is_empty());
    }
}
