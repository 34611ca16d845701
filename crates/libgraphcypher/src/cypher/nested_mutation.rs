use crate::authorization::AuthorizationOperation;
use crate::authorization::RuleEvaluator;
use crate::authorization::ValidationTiming;
use crate::cypher::RenderScope;
use crate::cypher::emitter::Emitter;
use crate::cypher::emitter::Result;
use crate::cypher::emitter::subquery;
use crate::cypher::emitter::validate_call;
use crate::cypher::escape_identifier;
use crate::cypher::escape_label;
use crate::cypher::predicate_render::labels_expr;
use crate::cypher::predicate_render::where_clause;
use crate::schema::ConcreteEntity;
use crate::schema::Relationship;
use crate::schema::ScalarKind;
use crate::translate::CreateNode;
use crate::translate::NestedWrite;
use crate::translate::NodeTarget;
use crate::translate::Predicate;
use crate::translate::PropertyWrite;
use crate::translate::Quantifier;
use crate::translate::RelationshipPredicate;
use crate::translate::RelationshipWrite;
use crate::translate::TranslateError;
use crate::translate::WriteOp;
use crate::translate::WriteValue;
use crate::translate::where_translator::relationship_pattern;

fn now_function(kind: &ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Date => "date()",
        ScalarKind::Time => "time()",
        ScalarKind::LocalTime => "localtime()",
        ScalarKind::LocalDateTime => "localdatetime()",
        _ => "datetime()",
    }
}

/// `<rel pattern>` from `source` to `target` with the edge bound to `edge`.
fn edge_pattern(rel: &Relationship, source: &str, edge: &str, target: &str) -> String {
    rel.direction().pattern(source, &format!("{edge}:{}", escape_label(rel.rel_type())), target)
}

impl Emitter<'_> {
    /// `var.prop = <expr>` for each write, with values bound as parameters.
    pub(crate) fn set_items(&mut self, var: &str, writes: &[PropertyWrite]) -> Vec<String> {
        writes.iter()
            .map(|write| {
                let property = format!("{var}.{}", escape_identifier(&write.db_name));
                let value = match &write.op {
                    WriteOp::Set(WriteValue::Param(value)) => self.env.param(value.clone()),
                    WriteOp::Set(WriteValue::RandomUuid) => "randomUUID()".to_string(),
                    WriteOp::Set(WriteValue::Now(kind)) => now_function(kind).to_string(),
                    WriteOp::Push(value) => format!("coalesce({property}, []) + {}", self.env.param(value.clone())),
                    WriteOp::Pop(count) =>
                        format!("{property}[0..size({property}) - {}]", self.env.param(count.clone())),
                    WriteOp::Increment(value) | WriteOp::Add(value) =>
                        format!("{property} + {}", self.env.param(value.clone())),
                    WriteOp::Decrement(value) | WriteOp::Subtract(value) =>
                        format!("{property} - {}", self.env.param(value.clone())),
                    WriteOp::Multiply(value) => format!("{property} * {}", self.env.param(value.clone())),
                    WriteOp::Divide(value) => format!("{property} / {}", self.env.param(value.clone())),
                };
                format!("{property} = {value}")
            })
            .collect()
    }

    /// `SET ...` over the given items; `None` when there is nothing to set.
    pub(crate) fn set_clause(items: Vec<String>) -> Option<String> {
        (!items.is_empty()).then(|| format!("SET {}", items.join(", ")))
    }

    /// Rules on the source side of an edge change: the source entity's
    /// annotations plus those of the relationship field.
    fn source_rules(
        &self,
        rel: &Relationship,
        operation: AuthorizationOperation,
        timing: ValidationTiming,
    ) -> Result<Predicate> {
        let Some(source) = self.model.concrete(rel.source()) else {
            return Ok(Predicate::True);
        };
        self.auth.authenticate(source, operation)?;
        let annotations = RuleEvaluator::annotations(source, [rel.field_name()]);
        self.auth.validate(source, &annotations, operation, timing)
    }

    /// Rules of every member `target` may be, each guarded by its labels
    /// when there is more than one.
    fn member_rules<F>(&self, target: &NodeTarget<'_>, rules: F) -> Result<Predicate>
    where
        F: Fn(&ConcreteEntity) -> Result<Predicate>,
    {
        match target.members.as_slice() {
            [member] => rules(member),
            members => {
                let mut parts = vec![];
                for member in members {
                    parts.push(Predicate::or([
                        Predicate::negate(Predicate::Labels(vec![member.label_string()])),
                        rules(member)?,
                    ]));
                }
                Ok(Predicate::and(parts))
            },
        }
    }

    /// Validate rules of the target side for `operation` at the given
    /// timings.
    pub(crate) fn target_rules(
        &self,
        target: &NodeTarget<'_>,
        operation: AuthorizationOperation,
        timings: &[ValidationTiming],
        written: &[&str],
    ) -> Result<Predicate> {
        self.member_rules(target, |member| {
            self.auth.authenticate(member, operation)?;
            let annotations = RuleEvaluator::annotations(member, written.iter().copied());
            let mut parts = vec![];
            for timing in timings {
                parts.push(self.auth.validate(member, &annotations, operation, *timing)?);
            }
            Ok(Predicate::and(parts))
        })
    }

    /// `CREATE` rules of `entity` for the written fields, BEFORE and AFTER
    /// together since the node only exists once written.
    fn create_rules(&self, entity: &ConcreteEntity, written: &[&str]) -> Result<Predicate> {
        self.auth.authenticate(entity, AuthorizationOperation::Create)?;
        let annotations = RuleEvaluator::annotations(entity, written.iter().copied());
        let predicate = Predicate::and([
            self.auth.validate(entity, &annotations, AuthorizationOperation::Create, ValidationTiming::Before)?,
            self.auth.validate(entity, &annotations, AuthorizationOperation::Create, ValidationTiming::After)?,
        ]);
        if predicate.is_false() {
            return Err(TranslateError::Forbidden);
        }
        Ok(predicate)
    }

    /// Validation that every required singular relationship of the created
    /// node is satisfied exactly once.
    pub(crate) fn required_relationship_checks(&mut self, entity: &ConcreteEntity, node: &str) -> Vec<String> {
        let model = self.model;
        let mut checks = vec![];
        for rel in entity.relationships().values().filter(|rel| rel.is_required()) {
            let predicate = Predicate::Relationship(Box::new(RelationshipPredicate {
                inner: Predicate::True,
                pattern: relationship_pattern(model, rel),
                quantifier: Quantifier::Single,
            }));
            let condition = self.render(&predicate, RenderScope::node(node));
            checks.push(validate_call(
                &condition,
                &TranslateError::RequiredRelationship {
                    field_name: rel.field_name().to_string(),
                    type_name: entity.name().to_string(),
                }.to_string(),
            ));
        }
        checks
    }

    /// `CREATE (node:Labels) SET ...`, the node's nested writes and the
    /// validations that run once they are done.
    pub(crate) fn create_node_clauses(&mut self, create: &CreateNode<'_>, node: &str) -> Result<Vec<String>> {
        let entity = create.entity;
        let mut written = create.properties.iter().map(|write| write.field_name.as_str()).collect::<Vec<_>>();
        written.extend(create.relationships.iter().map(|write| write.relationship.field_name()));
        let rules = self.create_rules(entity, &written)?;

        let mut clauses = vec![format!("CREATE ({node}{})", entity.label_string())];
        let items = self.set_items(node, &create.properties);
        clauses.extend(Self::set_clause(items));
        self.relationship_writes(node, &create.relationships, &mut clauses)?;
        clauses.extend(self.required_relationship_checks(entity, node));
        clauses.extend(self.validate_clause(&rules, RenderScope::node(node)));
        Ok(clauses)
    }

    /// Emits every nested write through `writes` as `CALL` subqueries
    /// importing `source`.
    pub(crate) fn relationship_writes(
        &mut self,
        source: &str,
        writes: &[RelationshipWrite<'_>],
        clauses: &mut Vec<String>,
    ) -> Result<()> {
        for write in writes {
            for op in &write.ops {
                let body = self.nested_write(source, write.relationship, op)?;
                clauses.push("WITH *".to_string());
                clauses.push(subquery(&body));
            }
        }
        Ok(())
    }

    fn target_match(&self, target: &NodeTarget<'_>, node: &str) -> (String, String) {
        match target.members.as_slice() {
            [member] => (format!("{node}{}", member.label_string()), String::new()),
            members => {
                let labels = members.iter().map(|member| member.label_string()).collect::<Vec<_>>();
                (node.to_string(), labels_expr(node, &labels))
            },
        }
    }

    /// Filter rules of every member `target` may be, for `operation`.
    pub(crate) fn target_filter(&self, target: &NodeTarget<'_>, operation: AuthorizationOperation) -> Result<Predicate> {
        let mut filters = vec![];
        for member in &target.members {
            self.auth.authenticate(member, operation)?;
            let annotations = RuleEvaluator::annotations(member, []);
            filters.push((member, self.auth.filter(member, &annotations, operation)?));
        }
        if let [(_, filter)] = filters.as_slice() {
            return Ok(filter.clone());
        }
        if filters.iter().all(|(_, filter)| filter.is_true()) {
            return Ok(Predicate::True);
        }
        Ok(Predicate::or(filters.into_iter().map(|(member, filter)| {
            Predicate::and([Predicate::Labels(vec![member.label_string()]), filter])
        })))
    }

    /// `MATCH (source)-[edge]->(node)` with the target filters of
    /// `operation`, shared by the writes that act on existing edges.
    fn match_existing(
        &mut self,
        rel: &Relationship,
        source: &str,
        edge: &str,
        node: &str,
        target: &NodeTarget<'_>,
        where_: &Predicate,
        operation: AuthorizationOperation,
    ) -> Result<String> {
        let (pattern, labels) = self.target_match(target, node);
        let filter = self.target_filter(target, operation)?;
        let scope = RenderScope::with_edge(node, edge);
        let rendered_where = self.render(where_, scope);
        let rendered_filter = self.render(&filter, scope);
        Ok(format!(
            "MATCH {}{}",
            edge_pattern(rel, source, edge, &pattern),
            where_clause(&[&labels, &rendered_where, &rendered_filter]),
        ))
    }

    fn nested_write(&mut self, source: &str, rel: &Relationship, op: &NestedWrite<'_>) -> Result<Vec<String>> {
        let count = self.env.var();
        let mut clauses = vec![format!("WITH {source}")];
        match op {
            NestedWrite::Create { edge, node } => {
                let target = self.env.node_var();
                let edge_var = self.env.var();
                clauses.extend(self.create_node_clauses(node, &target)?);
                clauses.push(format!("CREATE {}", edge_pattern(rel, source, &edge_var, &target)));
                let items = self.set_items(&edge_var, edge);
                clauses.extend(Self::set_clause(items));

                let operation = AuthorizationOperation::CreateRelationship;
                let timings = [ValidationTiming::Before, ValidationTiming::After];
                let source_rules = Predicate::and([
                    self.source_rules(rel, operation, ValidationTiming::Before)?,
                    self.source_rules(rel, operation, ValidationTiming::After)?,
                ]);
                let target_rules = self.target_rules(&NodeTarget::concrete(node.entity), operation, &timings, &[])?;
                if source_rules.is_false() || target_rules.is_false() {
                    return Err(TranslateError::Forbidden);
                }
                clauses.extend(self.validate_all(&[
                    (&source_rules, RenderScope::node(source)),
                    (&target_rules, RenderScope::node(&target)),
                ]));
            },
            NestedWrite::Connect { connect, edge, target, where_ } => {
                let node = self.env.node_var();
                let edge_var = self.env.var();
                let (pattern, labels) = self.target_match(target, &node);
                let filter = self.target_filter(target, AuthorizationOperation::CreateRelationship)?;
                let rendered = self.render(&Predicate::and([where_.clone(), filter]), RenderScope::node(&node));
                clauses.push(format!("MATCH ({pattern}){}", where_clause(&[&labels, &rendered])));

                let operation = AuthorizationOperation::CreateRelationship;
                let before_source = self.source_rules(rel, operation, ValidationTiming::Before)?;
                let before_target = self.target_rules(target, operation, &[ValidationTiming::Before], &[])?;
                clauses.extend(self.validate_all(&[
                    (&before_source, RenderScope::node(source)),
                    (&before_target, RenderScope::node(&node)),
                ]));

                clauses.push(format!("MERGE {}", edge_pattern(rel, source, &edge_var, &node)));
                let items = self.set_items(&edge_var, edge);
                clauses.extend(Self::set_clause(items));
                self.relationship_writes(&node, connect, &mut clauses)?;

                let after_source = self.source_rules(rel, operation, ValidationTiming::After)?;
                let after_target = self.target_rules(target, operation, &[ValidationTiming::After], &[])?;
                clauses.extend(self.validate_all(&[
                    (&after_source, RenderScope::node(source)),
                    (&after_target, RenderScope::node(&node)),
                ]));
            },
            NestedWrite::ConnectOrCreate { edge, on_create, target, unique } => {
                let node = self.env.node_var();
                let edge_var = self.env.var();
                let mut keys = vec![];
                for (db_name, value) in unique {
                    keys.push(format!("{}: {}", escape_identifier(db_name), self.env.param(value.clone())));
                }
                clauses.push(format!("MERGE ({node}{} {{ {} }})", target.label_string(), keys.join(", ")));
                let items = self.set_items(&node, on_create);
                if let Some(set) = Self::set_clause(items) {
                    clauses.push(format!("ON CREATE {set}"));
                }
                clauses.push(format!("MERGE {}", edge_pattern(rel, source, &edge_var, &node)));
                let items = self.set_items(&edge_var, edge);
                if let Some(set) = Self::set_clause(items) {
                    clauses.push(format!("ON CREATE {set}"));
                }

                let written = on_create.iter().map(|write| write.field_name.as_str()).collect::<Vec<_>>();
                let operation = AuthorizationOperation::CreateRelationship;
                let timings = [ValidationTiming::Before, ValidationTiming::After];
                let source_rules = Predicate::and([
                    self.source_rules(rel, operation, ValidationTiming::Before)?,
                    self.source_rules(rel, operation, ValidationTiming::After)?,
                ]);
                let target_rules = Predicate::and([
                    self.create_rules(target, &written)?,
                    self.target_rules(&NodeTarget::concrete(target), operation, &timings, &[])?,
                ]);
                if source_rules.is_false() || target_rules.is_false() {
                    return Err(TranslateError::Forbidden);
                }
                clauses.extend(self.validate_all(&[
                    (&source_rules, RenderScope::node(source)),
                    (&target_rules, RenderScope::node(&node)),
                ]));
            },
            NestedWrite::Update { edge, node: update, target, where_ } => {
                let node = self.env.node_var();
                let edge_var = self.env.var();
                clauses.push(self.match_existing(rel, source, &edge_var, &node, target, where_, AuthorizationOperation::Update)?);

                let mut written = vec![];
                if let Some(update) = update {
                    written.extend(update.properties.iter().map(|write| write.field_name.as_str()));
                    written.extend(update.relationships.iter().map(|write| write.relationship.field_name()));
                }
                let operation = AuthorizationOperation::Update;
                let before = self.target_rules(target, operation, &[ValidationTiming::Before], &written)?;
                clauses.extend(self.validate_clause(&before, RenderScope::node(&node)));

                let mut items = vec![];
                if let Some(update) = update {
                    items.extend(self.set_items(&node, &update.properties));
                }
                items.extend(self.set_items(&edge_var, edge));
                clauses.extend(Self::set_clause(items));
                if let Some(update) = update {
                    self.relationship_writes(&node, &update.relationships, &mut clauses)?;
                }

                let after = self.target_rules(target, operation, &[ValidationTiming::After], &written)?;
                clauses.extend(self.validate_clause(&after, RenderScope::node(&node)));
            },
            NestedWrite::Disconnect { disconnect, target, where_ } => {
                let node = self.env.node_var();
                let edge_var = self.env.var();
                let operation = AuthorizationOperation::DeleteRelationship;
                clauses.push(self.match_existing(rel, source, &edge_var, &node, target, where_, operation)?);

                let timings = [ValidationTiming::Before, ValidationTiming::After];
                let source_rules = Predicate::and([
                    self.source_rules(rel, operation, ValidationTiming::Before)?,
                    self.source_rules(rel, operation, ValidationTiming::After)?,
                ]);
                let target_rules = self.target_rules(target, operation, &timings, &[])?;
                clauses.extend(self.validate_all(&[
                    (&source_rules, RenderScope::node(source)),
                    (&target_rules, RenderScope::node(&node)),
                ]));
                self.relationship_writes(&node, disconnect, &mut clauses)?;
                clauses.push(format!("DELETE {edge_var}"));
            },
            NestedWrite::Delete { delete, target, where_ } => {
                let node = self.env.node_var();
                let edge_var = self.env.var();
                let operation = AuthorizationOperation::Delete;
                clauses.push(self.match_existing(rel, source, &edge_var, &node, target, where_, operation)?);

                let rules = self.target_rules(target, operation, &[ValidationTiming::After], &[])?;
                clauses.extend(self.validate_clause(&rules, RenderScope::node(&node)));
                self.relationship_writes(&node, delete, &mut clauses)?;
                clauses.push(format!("WITH DISTINCT {node}"));
                clauses.push(format!("DETACH DELETE {node}"));
            },
        }
        clauses.push(format!("RETURN count(*) AS {count}"));
        Ok(clauses)
    }
}
