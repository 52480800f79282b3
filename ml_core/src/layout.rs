use std::{collections::HashMap, ops::Range};

use crate::{arch::Sequential, MlErr, Result};

/// One named tensor inside the flat parameter buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub name: String,
    pub shape: Vec<usize>,
    pub range: Range<usize>,
}

/// Maps the flat parameter buffer of a built graph into named tensors.
/// This is the core "offsets + shapes" mechanism behind persistence.
///
/// Tensor names are `<kind>_<i>.<param>`, where `<i>` counts layers of the
/// same kind front to back: `conv2d_0.kernel`, `conv2d_0.bias`, ...,
/// `dense_1.bias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterLayout {
    entries: Vec<LayoutEntry>,
    total: usize,
}

impl ParameterLayout {
    pub fn new(graph: &Sequential) -> Self {
        let mut entries = Vec::new();
        let mut offset = 0;
        let mut kind_counts: HashMap<&'static str, usize> = HashMap::new();

        for layer in graph.layers() {
            let i = kind_counts.entry(layer.kind()).or_insert(0);
            for (pname, shape) in layer.param_shapes() {
                let len = shape.iter().product::<usize>();
                entries.push(LayoutEntry {
                    name: format!("{}_{}.{}", layer.kind(), i, pname),
                    shape,
                    range: offset..offset + len,
                });
                offset += len;
            }
            *i += 1;
        }

        Self {
            entries,
            total: offset,
        }
    }

    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Sanity check: entries must tile `total_params` exactly, front to back.
    pub fn validate(&self, total_params: usize) -> Result<()> {
        let mut offset = 0;
        for e in &self.entries {
            if e.range.start != offset {
                return Err(MlErr::SizeMismatch {
                    what: "layout",
                    got: e.range.start,
                    expected: offset,
                });
            }
            offset = e.range.end;
        }

        if offset != total_params {
            return Err(MlErr::SizeMismatch {
                what: "layout",
                got: offset,
                expected: total_params,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{layers::Layer, Shape};

    fn graph() -> Sequential {
        Sequential::new(
            Shape::image(6, 6, 1),
            [
                Layer::conv2d(2, (3, 3), None),
                Layer::max_pool2d((2, 2)),
                Layer::flatten(),
                Layer::dense(4, None),
            ],
        )
        .unwrap()
    }

    #[test]
    fn names_tensors_by_kind_and_position() {
        let layout = ParameterLayout::new(&graph());

        let names: Vec<&str> = layout.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            ["conv2d_0.kernel", "conv2d_0.bias", "dense_0.kernel", "dense_0.bias"]
        );
    }

    #[test]
    fn entries_tile_the_whole_buffer() {
        let graph = graph();
        let layout = ParameterLayout::new(&graph);

        layout.validate(graph.size()).unwrap();

        assert_eq!(layout.entries()[0].range, 0..18);
        assert_eq!(layout.entries()[1].range, 18..20);
        assert_eq!(layout.entries()[2].range, 20..52);
        assert_eq!(layout.entries()[3].range, 52..56);
    }

    #[test]
    fn validate_rejects_a_foreign_buffer_length() {
        let graph = graph();
        let layout = ParameterLayout::new(&graph);

        assert!(layout.validate(graph.size() + 1).is_err());
    }

    #[test]
    fn repeated_kinds_get_increasing_indices() {
        let graph = Sequential::new(
            Shape::image(6, 6, 1),
            [
                Layer::conv2d(1, (2, 2), None),
                Layer::conv2d(1, (2, 2), None),
                Layer::flatten(),
            ],
        )
        .unwrap();

        let layout = ParameterLayout::new(&graph);
        let names: Vec<&str> = layout.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            ["conv2d_0.kernel", "conv2d_0.bias", "conv2d_1.kernel", "conv2d_1.bias"]
        );
    }
}
