//! Ordered log of stroke operations since the last clear.

use crate::protocol::StrokeOp;

/// The stroke history used to rebuild the canvas on resize, late join or redraw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    ops: Vec<StrokeOp>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation. Called once per originated operation, never for replay.
    pub fn record(&mut self, op: StrokeOp) {
        self.ops.push(op);
    }

    /// Drop every operation.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Replace the whole log with an authoritative snapshot.
    pub fn replace(&mut self, ops: Vec<StrokeOp>) {
        self.ops = ops;
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrokeOp> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn last(&self) -> Option<&StrokeOp> {
        self.ops.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::protocol::Fill;

    fn fill(x: f64) -> StrokeOp {
        StrokeOp::Fill(Fill {
            x,
            y: 0.0,
            color: Rgba::BLACK,
            stroke_id: None,
        })
    }

    #[test]
    fn test_record_preserves_order() {
        let mut log = HistoryLog::new();
        log.record(fill(1.0));
        log.record(fill(2.0));
        log.record(fill(3.0));
        let xs: Vec<f64> = log
            .iter()
            .map(|op| match op {
                StrokeOp::Fill(f) => f.x,
                StrokeOp::Segment(_) => unreachable!(),
            })
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_clear_and_replace() {
        let mut log = HistoryLog::new();
        log.record(fill(1.0));
        log.clear();
        assert!(log.is_empty());

        log.replace(vec![fill(4.0), fill(5.0)]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last(), Some(&fill(5.0)));
    }
}
