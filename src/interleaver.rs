//! Per-symbol bit interleaving per 802.11a §17.3.5.6.
//!
//! The two permutation steps are combined into one map per (cbps, bpsc)
//! pair: the first spreads adjacent coded bits across nonadjacent
//! subcarriers, the second alternates them over the significance levels of
//! the constellation bits.

/// Combined permutation: coded bit `map[k]` of a symbol is transmitted at
/// position `k`.
fn build_map(cbps: usize, bpsc: usize) -> Vec<usize> {
    let s = (bpsc / 2).max(1);

    let mut first = vec![0usize; cbps];
    for (j, f) in first.iter_mut().enumerate() {
        *f = s * (j / s) + (j + 16 * j / cbps) % s;
    }

    let mut second = vec![0usize; cbps];
    for (i, sec) in second.iter_mut().enumerate() {
        *sec = 16 * i - (cbps - 1) * (16 * i / cbps);
    }

    first.iter().map(|&f| second[f]).collect()
}

/// Interleave whole symbols of `cbps` coded bits each.
pub fn interleave(bits: &[u8], cbps: usize, bpsc: usize) -> Vec<u8> {
    assert_eq!(bits.len() % cbps, 0);
    let map = build_map(cbps, bpsc);
    let mut out = vec![0u8; bits.len()];
    for (sym_in, sym_out) in bits.chunks_exact(cbps).zip(out.chunks_exact_mut(cbps)) {
        for (k, &m) in map.iter().enumerate() {
            sym_out[k] = sym_in[m];
        }
    }
    out
}

/// Exact inverse of [`interleave`], applied to soft bits on the receive
/// side.
pub fn deinterleave(bits: &[u8], cbps: usize, bpsc: usize) -> Vec<u8> {
    assert_eq!(bits.len() % cbps, 0);
    let map = build_map(cbps, bpsc);
    let mut out = vec![0u8; bits.len()];
    for (sym_in, sym_out) in bits.chunks_exact(cbps).zip(out.chunks_exact_mut(cbps)) {
        for (k, &m) in map.iter().enumerate() {
            sym_out[m] = sym_in[k];
        }
    }
    out
}
