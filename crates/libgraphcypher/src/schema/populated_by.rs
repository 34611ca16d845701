/// A write operation that can trigger `@populatedBy` callbacks and
/// `@timestamp` updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteOperation {
    Create,
    Update,
}
impl WriteOperation {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            _ => None,
        }
    }
}

/// `@populatedBy(callback: "...", operations: [CREATE, UPDATE])`
#[derive(Clone, Debug, PartialEq)]
pub struct PopulatedBy {
    pub(crate) callback: String,
    pub(crate) operations: Vec<WriteOperation>,
}
impl PopulatedBy {
    pub fn callback(&self) -> &str {
        self.callback.as_str()
    }

    pub fn runs_on(&self, operation: WriteOperation) -> bool {
        self.operations.contains(&operation)
    }
}
