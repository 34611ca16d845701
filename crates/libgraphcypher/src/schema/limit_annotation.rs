/// `@limit(default: ..., max: ...)`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LimitAnnotation {
    pub(crate) default: Option<u64>,
    pub(crate) max: Option<u64>,
}
impl LimitAnnotation {
    pub fn default_limit(&self) -> Option<u64> {
        self.default
    }

    pub fn max_limit(&self) -> Option<u64> {
        self.max
    }
}
