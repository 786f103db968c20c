//! Frame decoding fan-out.
//!
//! Frames carry no cross-frame state: each is a standalone LZ4 block that
//! decodes to a standalone JPEG.  [`decode_ordered`] therefore decodes a
//! slice of frame descriptors either sequentially or, with the `parallel`
//! feature, concurrently on Rayon's global pool.  Either way the output
//! vector is in input order and the first error *by index* is returned, so
//! results are identical between the two paths.
//!
//! # Progress
//! `on_decoded(i)` is called once per item, in index order.  Sequentially it
//! runs right after item `i` is decoded; in parallel it runs for every item
//! after the whole batch completes.

/// Decode every item of `items` with `decode`, preserving order.
///
/// `parallel` is a request; it has no effect unless the crate is built with
/// the `parallel` feature.
pub fn decode_ordered<T, E, F, P>(
    items:          &[T],
    parallel:       bool,
    decode:         F,
    mut on_decoded: P,
) -> Result<Vec<Vec<u8>>, E>
where
    T: Sync,
    E: Send,
    F: Fn(&T) -> Result<Vec<u8>, E> + Sync,
    P: FnMut(usize),
{
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;

        // Indexed collect keeps input order.
        let results: Vec<Result<Vec<u8>, E>> = items.par_iter().map(&decode).collect();

        let mut out = Vec::with_capacity(items.len());
        for r in results {
            out.push(r?);
        }
        for i in 0..out.len() {
            on_decoded(i);
        }
        return Ok(out);
    }

    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        out.push(decode(item)?);
        on_decoded(i);
    }
    Ok(out)
}
