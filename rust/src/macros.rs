//! Test helper macros.

/// Generate one `#[test]` per minimum degree for a scenario function
/// taking the degree as its only argument.
///
/// `degree_tests!(fill_and_drain: 2, 3, 5);` expands to
/// `fill_and_drain_degree_2`, `fill_and_drain_degree_3` and
/// `fill_and_drain_degree_5`.
#[cfg(test)]
macro_rules! degree_tests {
    ($scenario:ident: $($degree:literal),+ $(,)?) => {
        $(
            paste::paste! {
                #[test]
                fn [<$scenario _degree_ $degree>]() {
                    $scenario($degree);
                }
            }
        )+
    };
}
