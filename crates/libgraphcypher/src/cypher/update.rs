use crate::authorization::AuthorizationOperation;
use crate::authorization::AuthorizationPhase;
use crate::authorization::PhaseTracker;
use crate::authorization::RuleEvaluator;
use crate::authorization::ValidationTiming;
use crate::cypher::RenderScope;
use crate::cypher::create::event_map;
use crate::cypher::emitter::Emitter;
use crate::cypher::emitter::Result;
use crate::cypher::predicate_render::where_clause;
use crate::operation::FieldSelection;
use crate::schema::ConcreteEntity;
use crate::schema::EntityRef;
use crate::schema::naming::EntityNames;
use crate::translate::NodeTarget;
use crate::translate::Predicate;
use crate::translate::UpdateNode;
use crate::translate::mutation_input::MutationReader;
use crate::translate::where_translator::NodeScope;

impl Emitter<'_> {
    /// `update<Plural>(where, update, connect, disconnect, create, delete)`.
    pub(crate) fn top_level_update(&mut self, entity: &ConcreteEntity, field: &FieldSelection) -> Result<Vec<String>> {
        let model = self.model;
        let names = EntityNames::new(entity.name(), entity.plural());
        let reader = MutationReader::new(model);
        let present = |name: &str| field.argument(name).filter(|value| !value.is_null());

        let update = match present("update") {
            Some(value) => reader.update_node(NodeTarget::concrete(entity), NodeScope::Concrete(entity), value)?,
            None => UpdateNode {
                properties: vec![],
                relationships: vec![],
                target: NodeTarget::concrete(entity),
            },
        };
        let disconnect = match present("disconnect") {
            Some(value) => reader.disconnect_input(entity, value)?,
            None => vec![],
        };
        let connect = match present("connect") {
            Some(value) => reader.connect_input(entity, value)?,
            None => vec![],
        };
        let create = match present("create") {
            Some(value) => reader.relation_input(entity, value)?,
            None => vec![],
        };
        let delete = match present("delete") {
            Some(value) => reader.delete_input(entity, value)?,
            None => vec![],
        };

        let mut written = update.properties.iter().map(|write| write.field_name.as_str()).collect::<Vec<_>>();
        for write in update.relationships.iter().chain(&disconnect).chain(&connect).chain(&create).chain(&delete) {
            let field_name = write.relationship.field_name();
            if !written.contains(&field_name) {
                written.push(field_name);
            }
        }

        let operation = AuthorizationOperation::Update;
        self.auth.authenticate(entity, operation)?;
        let annotations = RuleEvaluator::annotations(entity, written.iter().copied());
        let filter = self.auth.filter(entity, &annotations, operation)?;
        let target = NodeTarget::concrete(entity);
        let before = self.target_rules(&target, operation, &[ValidationTiming::Before], &written)?;
        let after = self.target_rules(&target, operation, &[ValidationTiming::After], &written)?;

        let node = "this";
        let scope = RenderScope::node(node);
        let mut phases = PhaseTracker::new();
        let where_ = self.target_where(&EntityRef::Concrete(entity.name().to_string()), field.argument("where"))?;
        let rendered = self.render(&Predicate::and([where_, filter]), scope);
        let mut clauses = vec![format!("MATCH ({node}{}){}", entity.label_string(), where_clause(&[&rendered]))];
        clauses.extend(self.validate_clause(&before, scope));

        phases.advance(AuthorizationPhase::Write)?;
        let old = self.env.var();
        clauses.push(format!("WITH *, {node} {{ .* }} AS {old}"));
        let items = self.set_items(node, &update.properties);
        clauses.extend(Self::set_clause(items));
        self.relationship_writes(node, &update.relationships, &mut clauses)?;
        self.relationship_writes(node, &disconnect, &mut clauses)?;
        self.relationship_writes(node, &connect, &mut clauses)?;
        self.relationship_writes(node, &create, &mut clauses)?;
        self.relationship_writes(node, &delete, &mut clauses)?;

        phases.advance(AuthorizationPhase::PostValidate)?;
        let relinked = !update.relationships.is_empty() || !disconnect.is_empty() || !connect.is_empty();
        if relinked {
            clauses.extend(self.required_relationship_checks(entity, node));
        }
        clauses.extend(self.validate_clause(&after, scope));
        let (response, map) = self.response_projection(entity, field, &names.update_response_type(), node)?;
        clauses.extend(response);

        phases.advance(AuthorizationPhase::Response)?;
        clauses.push(format!(
            "RETURN collect(DISTINCT {map}) AS data, collect(DISTINCT {}) AS __events",
            event_map("update", entity, &[("old", old), ("new", format!("{node} {{ .* }}"))]),
        ));
        Ok(clauses)
    }
}
