use crate::operation::FieldSelection;
use crate::operation::OperationKind;

/// An operation with fragments expanded, `@skip`/`@include` applied and
/// variables substituted; ready for translation.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedOperation {
    pub(crate) kind: OperationKind,
    pub(crate) name: Option<String>,
    pub(crate) root_fields: Vec<FieldSelection>,
}
impl ResolvedOperation {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn root_fields(&self) -> &[FieldSelection] {
        self.root_fields.as_slice()
    }
}
