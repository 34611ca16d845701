/// A type annotation on a generated field or argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    List(Box<TypeRef>),
    Named(String),
    NonNull(Box<TypeRef>),
}
impl TypeRef {
    /// Parses GraphQL type notation such as `[Movie!]!`.
    pub fn parse(notation: &str) -> Option<Self> {
        let notation = notation.trim();
        if let Some(inner) = notation.strip_suffix('!') {
            return Self::parse(inner).map(|inner| Self::NonNull(Box::new(inner)));
        }
        if let Some(inner) = notation.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            return Self::parse(inner).map(|inner| Self::List(Box::new(inner)));
        }
        let valid = !notation.is_empty()
            && notation.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        valid.then(|| Self::Named(notation.to_string()))
    }

    /// The innermost named type.
    pub fn named(&self) -> &str {
        match self {
            Self::Named(name) => name.as_str(),
            Self::List(inner) | Self::NonNull(inner) => inner.named(),
        }
    }

    pub fn is_nullable(&self) -> bool {
        !matches!(self, Self::NonNull(_))
    }

    /// Whether the type is a list once the outer non-null marker is removed.
    pub fn is_list(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::NonNull(inner) => matches!(inner.as_ref(), Self::List(_)),
            Self::Named(_) => false,
        }
    }

    /// The item type of a (possibly non-null) list type.
    pub fn item_type(&self) -> Option<&TypeRef> {
        match self {
            Self::List(inner) => Some(inner),
            Self::NonNull(inner) => inner.item_type(),
            Self::Named(_) => None,
        }
    }
}
impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::Named(name) => write!(f, "{name}"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}
