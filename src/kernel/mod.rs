//! Kernel function registry.
//!
//! Primitives live under the `Larch.Kernel.*` module prefix and are
//! indexed by `(module, name)` with a declared arity. An implementation
//! receives the full argument vector, the evaluator config, the current
//! environment (already inside the kernel's call frame), and a sink for
//! call trees produced by re-entering the evaluator (higher-order
//! primitives like `map` do this through `interpreter::eval::apply`).

pub mod basics;
pub mod list;
pub mod string;
pub mod tuple;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::interpreter::env::Env;
use crate::interpreter::error::EvalError;
use crate::interpreter::trace::CallTree;
use crate::interpreter::value::Value;
use crate::interpreter::EvalConfig;

pub type KernelFn =
    fn(&[Value], &EvalConfig, &Env, &mut Vec<CallTree>) -> Result<Value, EvalError>;

pub struct Kernel {
    pub arity: usize,
    pub run: KernelFn,
}

#[derive(Default)]
pub struct Registry {
    modules: FxHashMap<&'static str, FxHashMap<&'static str, Kernel>>,
}

impl Registry {
    pub fn register(
        &mut self,
        module: &'static str,
        name: &'static str,
        arity: usize,
        run: KernelFn,
    ) {
        self.modules
            .entry(module)
            .or_default()
            .insert(name, Kernel { arity, run });
    }

    pub fn get(&self, module: &str, name: &str) -> Option<&Kernel> {
        self.modules.get(module)?.get(name)
    }

    /// Every registered `(module, name, arity)`, for stub generation.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str, usize)> + '_ {
        self.modules.iter().flat_map(|(module, table)| {
            table
                .iter()
                .map(move |(name, kernel)| (*module, *name, kernel.arity))
        })
    }
}

/// Module path prefix under which primitives are addressable.
pub const KERNEL_PREFIX: &str = "Larch.Kernel";

pub fn is_kernel_module(module: &str) -> bool {
    module == KERNEL_PREFIX
        || module
            .strip_prefix(KERNEL_PREFIX)
            .map_or(false, |rest| rest.starts_with('.'))
}

pub static KERNELS: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::default();
    basics::register(&mut registry);
    list::register(&mut registry);
    string::register(&mut registry);
    tuple::register(&mut registry);
    registry
});
