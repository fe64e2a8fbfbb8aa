//! Evaluation environment.
//!
//! Persistent maps (`im`) make cloning an `Env` cheap: closures capture
//! the whole environment by value, and every trampoline step replaces the
//! loop's environment wholesale, so clones happen constantly and must
//! share structure instead of copying it.
//!
//! Local bindings live in `values`; module-level and let-bound functions
//! live in `functions` under their module name so that recursive (and
//! mutually recursive) definitions can resolve each other by name at call
//! time without their bodies having been evaluated.

use std::rc::Rc;

use crate::ast::expression::Expression;
use crate::ast::pattern::Pattern;

use super::value::{QualifiedName, Value};

/// A function definition: parameter patterns plus the body to evaluate
/// once all parameters are supplied. Zero parameters make it a constant
/// applicative form, re-evaluated lazily on each reference.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionImpl {
    pub params: Rc<Vec<Pattern>>,
    pub body: Rc<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Env {
    /// Module whose lexical scope we are evaluating under; bare names
    /// resolve against this module's function table.
    pub current_module: String,
    pub values: im::HashMap<String, Value>,
    pub functions: im::HashMap<String, im::HashMap<String, FunctionImpl>>,
    /// Frames in the order they were entered, for diagnostics only.
    pub call_stack: im::Vector<QualifiedName>,
}

impl Env {
    pub fn new(current_module: impl Into<String>) -> Self {
        Self {
            current_module: current_module.into(),
            values: im::HashMap::new(),
            functions: im::HashMap::new(),
            call_stack: im::Vector::new(),
        }
    }

    pub fn lookup_value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn lookup_function(&self, module: &str, name: &str) -> Option<&FunctionImpl> {
        self.functions.get(module)?.get(name)
    }

    pub fn define_value(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn define_function(
        &mut self,
        module: impl Into<String>,
        name: impl Into<String>,
        function: FunctionImpl,
    ) {
        let module = module.into();
        let mut table = self.functions.get(&module).cloned().unwrap_or_default();
        table.insert(name.into(), function);
        self.functions.insert(module, table);
    }

    /// A copy of this environment with extra local bindings; new bindings
    /// shadow existing ones.
    pub fn extend_values(&self, bindings: im::HashMap<String, Value>) -> Env {
        let mut env = self.clone();
        env.values = bindings.union(env.values);
        env
    }

    /// A copy of this environment entering the named function's frame.
    pub fn enter_frame(&self, name: &QualifiedName) -> Env {
        let mut env = self.clone();
        if !name.module.is_empty() {
            env.current_module = name.module.clone();
        }
        env.call_stack.push_back(name.clone());
        env
    }

    /// The call stack as a plain vector, for attaching to errors.
    pub fn stack(&self) -> Vec<QualifiedName> {
        self.call_stack.iter().cloned().collect()
    }
}
