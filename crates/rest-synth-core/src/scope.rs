//! Variable resolution while a chain is being assembled.

use rest_synth_types::TypeExpr;

use crate::frame::{VarRef, Variable};

#[derive(Debug, Clone)]
struct ScopeEntry {
    variable: Variable,
    source: VarRef,
}

/// The values available at the current end of a chain under construction.
///
/// Method parameters are in scope from the start; each frame output is
/// added as the frame is appended. Declared names never collide with
/// anything already in scope.
#[derive(Debug, Clone, Default)]
pub struct VariableScope {
    entries: Vec<ScopeEntry>,
}

impl VariableScope {
    /// Scope seeded with the method's parameters.
    pub fn with_arguments(arguments: &[Variable]) -> Self {
        let entries = arguments
            .iter()
            .enumerate()
            .map(|(idx, variable)| ScopeEntry {
                variable: variable.clone(),
                source: VarRef::Argument(idx as u16),
            })
            .collect();
        Self { entries }
    }

    /// Introduce the output of the frame at `frame_index`.
    ///
    /// The name is `base`, or `base1`, `base2`, ... if `base` is taken.
    pub fn declare(&mut self, base: &str, ty: TypeExpr, frame_index: u16) -> Variable {
        let name = self.unique_name(base);
        let variable = Variable::new(name, ty);
        self.entries.push(ScopeEntry {
            variable: variable.clone(),
            source: VarRef::Frame(frame_index),
        });
        variable
    }

    /// Most recent value with this name.
    pub fn resolve(&self, name: &str) -> Option<VarRef> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.variable.name == name)
            .map(|entry| entry.source)
    }

    /// Most recent value of this type.
    pub fn resolve_by_type(&self, ty: &TypeExpr) -> Option<VarRef> {
        self.entries
            .iter()
            .rev()
            .find(|entry| &entry.variable.ty == ty)
            .map(|entry| entry.source)
    }

    /// The method parameter with this exact (case-sensitive) name.
    pub fn resolve_argument(&self, name: &str) -> Option<u16> {
        self.entries.iter().find_map(|entry| match entry.source {
            VarRef::Argument(idx) if entry.variable.name == name => Some(idx),
            _ => None,
        })
    }

    /// Most recent frame output of this type, ignoring parameters.
    pub fn resolve_output(&self, ty: &TypeExpr) -> Option<VarRef> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| matches!(entry.source, VarRef::Frame(_)))
            .find(|entry| &entry.variable.ty == ty)
            .map(|entry| entry.source)
    }

    pub fn variable(&self, source: VarRef) -> Option<&Variable> {
        self.entries
            .iter()
            .find(|entry| entry.source == source)
            .map(|entry| &entry.variable)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.variable.name == name)
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_avoids_parameter_names() {
        let mut scope = VariableScope::with_arguments(&[
            Variable::new("url", TypeExpr::named("String")),
            Variable::new("url1", TypeExpr::named("String")),
        ]);
        let declared = scope.declare("url", TypeExpr::named("String"), 1);
        assert_eq!(declared.name, "url2");
        assert_eq!(scope.resolve("url2"), Some(VarRef::Frame(1)));
        assert_eq!(scope.resolve("url"), Some(VarRef::Argument(0)));

        scope.declare("transport", TypeExpr::named("TransportHandle"), 0);
        assert_eq!(scope.resolve_argument("url1"), Some(1));
        assert_eq!(scope.resolve_argument("transport"), None);
        assert_eq!(scope.resolve_argument("URL"), None);
    }

    #[test]
    fn test_resolve_by_type_prefers_latest() {
        let mut scope = VariableScope::with_arguments(&[Variable::new(
            "raw",
            TypeExpr::named("HttpResponse"),
        )]);
        assert_eq!(
            scope.resolve_by_type(&TypeExpr::named("HttpResponse")),
            Some(VarRef::Argument(0))
        );
        scope.declare("response", TypeExpr::named("HttpResponse"), 4);
        assert_eq!(
            scope.resolve_by_type(&TypeExpr::named("HttpResponse")),
            Some(VarRef::Frame(4))
        );
        assert!(scope.resolve_by_type(&TypeExpr::named("Missing")).is_none());

        let fresh = VariableScope::with_arguments(&[Variable::new(
            "raw",
            TypeExpr::named("HttpResponse"),
        )]);
        assert!(fresh
            .resolve_output(&TypeExpr::named("HttpResponse"))
            .is_none());
        assert_eq!(
            scope.resolve_output(&TypeExpr::named("HttpResponse")),
            Some(VarRef::Frame(4))
        );
        assert_eq!(
            scope.variable(VarRef::Frame(4)).map(|v| v.name.as_str()),
            Some("response")
        );
    }
}
