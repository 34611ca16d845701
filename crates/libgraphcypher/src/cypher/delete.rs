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
use crate::translate::NodeTarget;
use crate::translate::Predicate;
use crate::translate::mutation_input::MutationReader;

impl Emitter<'_> {
    /// `delete<Plural>(where, delete)`. The response is built from the
    /// executor's counters; the statement only returns the events.
    pub(crate) fn top_level_delete(&mut self, entity: &ConcreteEntity, field: &FieldSelection) -> Result<Vec<String>> {
        let model = self.model;
        let reader = MutationReader::new(model);
        let delete = match field.argument("delete") {
            Some(value) => reader.delete_input(entity, value)?,
            None => vec![],
        };

        let operation = AuthorizationOperation::Delete;
        self.auth.authenticate(entity, operation)?;
        let annotations = RuleEvaluator::annotations(entity, []);
        let filter = self.auth.filter(entity, &annotations, operation)?;
        let rules = self.target_rules(&NodeTarget::concrete(entity), operation, &[ValidationTiming::After], &[])?;

        let node = "this";
        let scope = RenderScope::node(node);
        let mut phases = PhaseTracker::new();
        let where_ = self.target_where(&EntityRef::Concrete(entity.name().to_string()), field.argument("where"))?;
        let rendered = self.render(&Predicate::and([where_, filter]), scope);
        let mut clauses = vec![format!("MATCH ({node}{}){}", entity.label_string(), where_clause(&[&rendered]))];
        clauses.extend(self.validate_clause(&rules, scope));

        phases.advance(AuthorizationPhase::Write)?;
        let old = self.env.var();
        clauses.push(format!("WITH *, {node} {{ .* }} AS {old}"));
        self.relationship_writes(node, &delete, &mut clauses)?;
        clauses.push(format!("WITH DISTINCT {node}, {old}"));
        clauses.push(format!("DETACH DELETE {node}"));

        phases.advance(AuthorizationPhase::Response)?;
        clauses.push(format!(
            "RETURN collect({}) AS __events",
            event_map("delete", entity, &[("old", old)]),
        ));
        Ok(clauses)
    }
}
