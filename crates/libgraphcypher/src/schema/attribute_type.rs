use crate::ast;
use crate::schema::ScalarKind;

/// The declared GraphQL type of an attribute, e.g. `[String!]!`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeType {
    pub(crate) items_nullable: bool,
    pub(crate) kind: ScalarKind,
    pub(crate) list: bool,
    pub(crate) nullable: bool,
}
impl AttributeType {
    pub fn scalar(kind: ScalarKind, nullable: bool) -> Self {
        Self {
            items_nullable: false,
            kind,
            list: false,
            nullable,
        }
    }

    pub fn list_of(kind: ScalarKind, nullable: bool, items_nullable: bool) -> Self {
        Self {
            items_nullable,
            kind,
            list: true,
            nullable,
        }
    }

    /// Reads the wrapping of a field type annotation. Returns `None` for
    /// nested lists, which cannot be stored as properties.
    pub(crate) fn from_ast(ast_type: &ast::schema::Type, kind: ScalarKind) -> Option<Self> {
        use graphql_parser::schema::Type;

        let (nullable, inner) = match ast_type {
            Type::NonNullType(inner) => (false, inner.as_ref()),
            other => (true, other),
        };
        match inner {
            Type::NamedType(_) => Some(Self::scalar(kind, nullable)),
            Type::ListType(item) => {
                let (items_nullable, item) = match item.as_ref() {
                    Type::NonNullType(item) => (false, item.as_ref()),
                    other => (true, other),
                };
                match item {
                    Type::NamedType(_) => Some(Self::list_of(kind, nullable, items_nullable)),
                    _ => None,
                }
            },
            Type::NonNullType(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        self.list
    }

    pub fn items_nullable(&self) -> bool {
        self.items_nullable
    }

    pub fn kind(&self) -> &ScalarKind {
        &self.kind
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// The same type with the outer non-null marker dropped, as used by
    /// update and filter inputs.
    pub fn as_nullable(&self) -> Self {
        Self {
            nullable: true,
            ..self.clone()
        }
    }

    /// Renders the type as it appears on an input field.
    pub fn input_type_string(&self) -> String {
        self.render(self.kind.input_type_name())
    }

    fn render(&self, name: &str) -> String {
        let mut rendered = name.to_string();
        if self.list {
            if !self.items_nullable {
                rendered.push('!');
            }
            rendered = format!("[{rendered}]");
        }
        if !self.nullable {
            rendered.push('!');
        }
        rendered
    }
}
impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(self.kind.graphql_name()))
    }
}
