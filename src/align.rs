/// Rounds a requested size up to the next multiple of 4 bytes.
///
/// Zero stays zero, so degenerate requests can be rejected before they
/// reach the free-block search.
///
/// # Examples
///
/// ```rust
/// assert_eq!(fitalloc::align4!(1), 4);
/// assert_eq!(fitalloc::align4!(4), 4);
/// assert_eq!(fitalloc::align4!(13), 16);
/// assert_eq!(fitalloc::align4!(0), 0);
/// ```
#[macro_export]
macro_rules! align4 {
  ($value:expr) => {
    (($value) + 3) & !3usize
  };
}
