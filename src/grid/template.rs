/// Layered neighbour offsets used by the interfacial and ghost sweeps.
///
/// Layer `r` holds the offsets whose largest component magnitude is `r` and
/// that have at most two non-zero components: the axis neighbours and the
/// in-plane diagonals reached by a stencil with mixed second derivatives.
/// Offsets are grouped by layer and sorted by squared length inside a layer,
/// so every layer `1..=r` forms a contiguous prefix of the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTemplate {
    offsets: Vec<[isize; 3]>,
    layer_ends: Vec<usize>,
}

impl SearchTemplate {
    /// Builds the template for `layers` search layers.
    #[must_use]
    pub fn new(layers: usize) -> Self {
        let reach = isize::try_from(layers).unwrap_or(isize::MAX);
        let mut keyed: Vec<(isize, isize, [isize; 3])> = Vec::new();
        for k in -reach..=reach {
            for j in -reach..=reach {
                for i in -reach..=reach {
                    let off = [i, j, k];
                    let nonzero = off.iter().filter(|&&c| c != 0).count();
                    if nonzero == 0 || nonzero > 2 {
                        continue;
                    }
                    let layer = off.iter().map(|c| c.abs()).max().unwrap_or(0);
                    let len2 = off.iter().map(|c| c * c).sum();
                    keyed.push((layer, len2, off));
                }
            }
        }
        keyed.sort_unstable();

        let mut layer_ends = Vec::with_capacity(layers);
        for r in 1..=reach {
            let end = keyed.partition_point(|&(layer, _, _)| layer <= r);
            layer_ends.push(end);
        }

        Self {
            offsets: keyed.into_iter().map(|(_, _, off)| off).collect(),
            layer_ends,
        }
    }

    /// All offsets in search order.
    #[must_use]
    pub fn offsets(&self) -> &[[isize; 3]] {
        &self.offsets
    }

    /// Number of search layers.
    #[must_use]
    pub fn layers(&self) -> usize {
        self.layer_ends.len()
    }

    /// Exclusive end of each layer inside [`offsets`](Self::offsets).
    #[must_use]
    pub fn layer_ends(&self) -> &[usize] {
        &self.layer_ends
    }

    /// 1-based layer containing the offset at `position`.
    #[must_use]
    pub fn layer_of(&self, position: usize) -> Option<usize> {
        self.layer_ends
            .iter()
            .position(|&end| position < end)
            .map(|r| r + 1)
    }
}
