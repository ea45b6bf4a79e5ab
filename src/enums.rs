/// How series groups are clustered once they have been formed.
///
/// Files inside one series are always visited in input order; `Parallel` only
/// spreads independent series groups over the rayon pool.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    #[default]
    Sequential,
    Parallel,
}
