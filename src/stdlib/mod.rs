//! Standard library loading.
//!
//! Every kernel module is exposed to programs as a stub module:
//! `Larch.Kernel.List.map` becomes the user-facing `List.map`, a
//! two-parameter function whose body is the kernel reference itself, so
//! calls go straight through the evaluator's kernel fast path. The
//! operator table and the module alias table live here as data, not as
//! match arms scattered through the evaluator.

use std::rc::Rc;

use crate::ast::expression::Expression;
use crate::ast::pattern::Pattern;
use crate::ast::Module;
use crate::interpreter::env::{Env, FunctionImpl};
use crate::kernel::{KERNELS, KERNEL_PREFIX};

/// Module qualifiers rewritten before lookup. `Kernel.Basics.add` is a
/// shorthand for `Larch.Kernel.Basics.add`.
pub const MODULE_ALIASES: &[(&str, &str)] = &[("Kernel", KERNEL_PREFIX)];

pub fn resolve_alias(module: &str) -> String {
    for (alias, target) in MODULE_ALIASES {
        if module == *alias {
            return (*target).to_string();
        }
        if let Some(rest) = module.strip_prefix(alias) {
            if let Some(rest) = rest.strip_prefix('.') {
                return format!("{target}.{rest}");
            }
        }
    }
    module.to_string()
}

/// Operator symbols and the kernel function each resolves to. `&&` and
/// `||` are absent: the evaluator short-circuits them itself.
pub const OPERATORS: &[(&str, &str, &str)] = &[
    ("+", "Larch.Kernel.Basics", "add"),
    ("-", "Larch.Kernel.Basics", "sub"),
    ("*", "Larch.Kernel.Basics", "mul"),
    ("/", "Larch.Kernel.Basics", "fdiv"),
    ("//", "Larch.Kernel.Basics", "idiv"),
    ("^", "Larch.Kernel.Basics", "pow"),
    ("++", "Larch.Kernel.Basics", "append"),
    ("==", "Larch.Kernel.Basics", "eq"),
    ("/=", "Larch.Kernel.Basics", "neq"),
    ("<", "Larch.Kernel.Basics", "lt"),
    (">", "Larch.Kernel.Basics", "gt"),
    ("<=", "Larch.Kernel.Basics", "le"),
    (">=", "Larch.Kernel.Basics", "ge"),
    ("|>", "Larch.Kernel.Basics", "apR"),
    ("<|", "Larch.Kernel.Basics", "apL"),
    ("<<", "Larch.Kernel.Basics", "composeL"),
    (">>", "Larch.Kernel.Basics", "composeR"),
    ("::", "Larch.Kernel.List", "cons"),
];

pub fn operator_target(op: &str) -> Option<(&'static str, &'static str)> {
    OPERATORS
        .iter()
        .find(|(symbol, _, _)| *symbol == op)
        .map(|(_, module, name)| (*module, *name))
}

/// Build the evaluation environment for a parsed module: stdlib stubs
/// first, then the module's own declarations under its name.
pub fn prepare_environment(module: &Module) -> Env {
    let mut env = Env::new(module.name.clone());

    let mut stub_count = 0usize;
    for (kernel_module, name, arity) in KERNELS.entries() {
        let user_module = kernel_module
            .strip_prefix(KERNEL_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(kernel_module);
        env.define_function(
            user_module,
            name,
            FunctionImpl {
                params: Rc::new(vec![Pattern::Anything; arity]),
                body: Rc::new(Expression::qualified(kernel_module, name)),
            },
        );
        stub_count += 1;
    }

    for declaration in &module.declarations {
        env.define_function(
            module.name.clone(),
            declaration.name.clone(),
            FunctionImpl {
                params: Rc::new(declaration.params.clone()),
                body: Rc::new(declaration.body.clone()),
            },
        );
    }

    tracing::debug!(
        module = %module.name,
        stubs = stub_count,
        declarations = module.declarations.len(),
        "environment prepared"
    );
    env
}
