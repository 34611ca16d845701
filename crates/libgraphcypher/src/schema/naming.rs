//! Names of the generated operations and types.

pub(crate) fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("man", "men"),
    ("mouse", "mice"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

const UNCOUNTABLE: &[&str] = &[
    "data", "equipment", "information", "metadata", "news", "series", "sheep", "species",
];

/// English plural of the last word of a (Pascal or camel cased) name.
pub(crate) fn pluralize(word: &str) -> String {
    let split_at = word.char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(idx, _)| idx)
        .last()
        .unwrap_or(0);
    let (head, last) = word.split_at(split_at);
    let lower = last.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        let plural = if last.starts_with(char::is_uppercase) {
            upper_first(plural)
        } else {
            plural.to_string()
        };
        return format!("{head}{plural}");
    }

    let ends_with_consonant_y = lower.ends_with('y')
        && !lower[..lower.len() - 1].ends_with(['a', 'e', 'i', 'o', 'u']);
    if ends_with_consonant_y {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| lower.ends_with(suffix)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Plural used for root fields: `@plural(value)` when given, otherwise the
/// pluralized type name; camel cased either way.
pub(crate) fn plural_for(type_name: &str, plural_override: Option<&str>) -> String {
    match plural_override {
        Some(value) => lower_first(value),
        None => lower_first(&pluralize(type_name)),
    }
}

/// Root field and generated type names derived from one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityNames {
    pub(crate) name: String,
    pub(crate) plural: String,
}
impl EntityNames {
    pub fn new(name: &str, plural: &str) -> Self {
        Self {
            name: name.to_string(),
            plural: plural.to_string(),
        }
    }

    fn pascal_plural(&self) -> String {
        upper_first(&self.plural)
    }

    pub fn read_field(&self) -> String {
        self.plural.clone()
    }

    pub fn connection_field(&self) -> String {
        format!("{}Connection", self.plural)
    }

    pub fn aggregate_field(&self) -> String {
        format!("{}Aggregate", self.plural)
    }

    pub fn create_field(&self) -> String {
        format!("create{}", self.pascal_plural())
    }

    pub fn update_field(&self) -> String {
        format!("update{}", self.pascal_plural())
    }

    pub fn delete_field(&self) -> String {
        format!("delete{}", self.pascal_plural())
    }

    pub fn created_field(&self) -> String {
        format!("{}Created", lower_first(&self.name))
    }

    pub fn updated_field(&self) -> String {
        format!("{}Updated", lower_first(&self.name))
    }

    pub fn deleted_field(&self) -> String {
        format!("{}Deleted", lower_first(&self.name))
    }

    pub fn where_type(&self) -> String {
        format!("{}Where", self.name)
    }

    pub fn connection_type(&self) -> String {
        format!("{}Connection", self.pascal_plural())
    }

    pub fn edge_type(&self) -> String {
        format!("{}Edge", self.name)
    }

    pub fn aggregate_selection_type(&self) -> String {
        format!("{}AggregateSelection", self.name)
    }

    pub fn create_response_type(&self) -> String {
        format!("Create{}MutationResponse", self.pascal_plural())
    }

    pub fn update_response_type(&self) -> String {
        format!("Update{}MutationResponse", self.pascal_plural())
    }

    /// Name of the field holding the written nodes on a mutation response.
    pub fn response_nodes_field(&self) -> String {
        self.plural.clone()
    }

    pub fn created_event_type(&self) -> String {
        format!("{}CreatedEvent", self.name)
    }

    pub fn updated_event_type(&self) -> String {
        format!("{}UpdatedEvent", self.name)
    }

    pub fn deleted_event_type(&self) -> String {
        format!("{}DeletedEvent", self.name)
    }

    pub fn event_payload_type(&self) -> String {
        format!("{}EventPayload", self.name)
    }

    pub fn created_event_field(&self) -> String {
        format!("created{}", self.name)
    }

    pub fn updated_event_field(&self) -> String {
        format!("updated{}", self.name)
    }

    pub fn deleted_event_field(&self) -> String {
        format!("deleted{}", self.name)
    }
}

/// Prefix shared by the per-relationship generated types, e.g.
/// `MovieActors` for `Movie.actors`.
pub(crate) fn relationship_prefix(source: &str, field_name: &str) -> String {
    format!("{source}{}", upper_first(field_name))
}
