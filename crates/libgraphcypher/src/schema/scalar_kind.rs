/// The scalar types an attribute can hold.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    BigInt,
    Boolean,
    CartesianPoint,
    Date,
    DateTime,
    Duration,
    Enum(String),
    Float,
    ID,
    Int,
    LocalDateTime,
    LocalTime,
    Point,
    String,
    Time,
}
impl ScalarKind {
    /// Resolves a named type to a scalar kind. `enum_names` lists the enums
    /// defined by the type definitions.
    pub fn from_name<'a>(
        name: &str,
        mut enum_names: impl Iterator<Item = &'a String>,
    ) -> Option<Self> {
        Some(match name {
            "BigInt" => Self::BigInt,
            "Boolean" => Self::Boolean,
            "CartesianPoint" => Self::CartesianPoint,
            "Date" => Self::Date,
            "DateTime" => Self::DateTime,
            "Duration" => Self::Duration,
            "Float" => Self::Float,
            "ID" => Self::ID,
            "Int" => Self::Int,
            "LocalDateTime" => Self::LocalDateTime,
            "LocalTime" => Self::LocalTime,
            "Point" => Self::Point,
            "String" => Self::String,
            "Time" => Self::Time,
            _ if enum_names.any(|enum_name| enum_name == name) =>
                Self::Enum(name.to_string()),
            _ => return None,
        })
    }

    /// Names of the built-in scalars that the engine understands. Type
    /// definitions may redeclare these with `scalar X` without effect.
    pub fn builtin_names() -> &'static [&'static str] {
        &[
            "BigInt", "Boolean", "CartesianPoint", "Date", "DateTime",
            "Duration", "Float", "ID", "Int", "LocalDateTime", "LocalTime",
            "Point", "String", "Time",
        ]
    }

    pub fn graphql_name(&self) -> &str {
        match self {
            Self::BigInt => "BigInt",
            Self::Boolean => "Boolean",
            Self::CartesianPoint => "CartesianPoint",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Duration => "Duration",
            Self::Enum(name) => name.as_str(),
            Self::Float => "Float",
            Self::ID => "ID",
            Self::Int => "Int",
            Self::LocalDateTime => "LocalDateTime",
            Self::LocalTime => "LocalTime",
            Self::Point => "Point",
            Self::String => "String",
            Self::Time => "Time",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::BigInt | Self::Float | Self::Int)
    }

    pub fn is_spatial(&self) -> bool {
        matches!(self, Self::CartesianPoint | Self::Point)
    }

    pub fn is_string_like(&self) -> bool {
        matches!(self, Self::ID | Self::String)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Date
                | Self::DateTime
                | Self::Duration
                | Self::LocalDateTime
                | Self::LocalTime
                | Self::Time
        )
    }

    /// Whether `_LT`/`_GT` style comparisons are generated for this kind.
    pub fn is_comparable(&self) -> bool {
        self.is_numeric() || self.is_temporal() || self.is_string_like()
    }

    /// The input type used for values of this kind. Spatial scalars are
    /// written through dedicated input objects.
    pub fn input_type_name(&self) -> &str {
        match self {
            Self::Point => "PointInput",
            Self::CartesianPoint => "CartesianPointInput",
            other => other.graphql_name(),
        }
    }

    /// The `<Scalar>AggregateSelection` type name when values of this kind
    /// can be aggregated.
    pub fn aggregate_selection_name(&self) -> Option<String> {
        match self {
            Self::Boolean | Self::Enum(_) | Self::Point | Self::CartesianPoint => None,
            other => Some(format!("{}AggregateSelection", other.graphql_name())),
        }
    }
}
impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.graphql_name())
    }
}
