/// When a `validate` rule runs relative to the write it guards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationTiming {
    After,
    Before,
}
impl ValidationTiming {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "AFTER" => Some(Self::After),
            "BEFORE" => Some(Self::Before),
            _ => None,
        }
    }
}
