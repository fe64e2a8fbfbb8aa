//! Dependency analysis for let blocks.
//!
//! Declarations in a `let` may reference each other in any order, and
//! functions with at least one parameter may be mutually recursive: they
//! are installed in the environment by name without evaluating their
//! bodies. Everything else (destructurings and nullary bindings) must be
//! evaluated eagerly, so a cycle through one of those has no consistent
//! evaluation order and is rejected.
//!
//! `sort_declarations` builds the reference graph between declarations,
//! runs Tarjan's strongly-connected-components algorithm (which emits
//! components dependencies-first), checks each component's legality, and
//! returns the evaluation order as indices into the declaration list.

use std::collections::{HashMap, HashSet};

use crate::ast::expression::{Expression, LetDeclaration};

use super::env::Env;
use super::error::EvalError;

pub fn sort_declarations(
    env: &Env,
    declarations: &[LetDeclaration],
) -> Result<Vec<usize>, EvalError> {
    let count = declarations.len();

    // Which declaration defines each name.
    let mut owner: HashMap<String, usize> = HashMap::new();
    for (index, decl) in declarations.iter().enumerate() {
        let mut names = Vec::new();
        match decl {
            LetDeclaration::Function { name, .. } => names.push(name.clone()),
            LetDeclaration::Destructuring { pattern, .. } => pattern.bound_names(&mut names),
        }
        for name in names {
            owner.insert(name, index);
        }
    }

    // Edges from each declaration to the sibling declarations it uses.
    let mut graph: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (index, decl) in declarations.iter().enumerate() {
        let mut free = HashSet::new();
        let mut bound = Vec::new();
        match decl {
            LetDeclaration::Function { params, body, .. } => {
                for param in params {
                    param.bound_names(&mut bound);
                }
                free_variables(body, &mut bound, &mut free);
            }
            LetDeclaration::Destructuring { body, .. } => {
                free_variables(body, &mut bound, &mut free);
            }
        }
        let mut targets: Vec<usize> = free.iter().filter_map(|name| owner.get(name)).copied().collect();
        targets.sort_unstable();
        targets.dedup();
        graph[index] = targets;
    }

    let components = Tarjan::run(&graph);

    let mut order = Vec::with_capacity(count);
    for mut component in components {
        let cyclic = component.len() > 1
            || graph[component[0]].contains(&component[0]);
        if cyclic {
            let all_recursive_functions = component.iter().all(|&index| {
                matches!(
                    &declarations[index],
                    LetDeclaration::Function { params, .. } if !params.is_empty()
                )
            });
            if !all_recursive_functions {
                return Err(EvalError::type_error(env, "illegal cycle in let block"));
            }
        }
        component.sort_unstable();
        order.extend(component);
    }
    Ok(order)
}

/// Collect free lowercase variable references in `expr`, skipping names
/// in `bound`. Qualified references and constructors never count.
pub fn free_variables(expr: &Expression, bound: &mut Vec<String>, out: &mut HashSet<String>) {
    match expr {
        Expression::Name { module, name } => {
            if module.is_empty()
                && name.chars().next().map_or(false, char::is_lowercase)
                && !bound.iter().any(|b| b == name)
            {
                out.insert(name.clone());
            }
        }
        Expression::Negation(inner) | Expression::Parenthesized(inner) => {
            free_variables(inner, bound, out)
        }
        Expression::RecordAccess(inner, _) => free_variables(inner, bound, out),
        Expression::BinaryOp { left, right, .. } => {
            free_variables(left, bound, out);
            free_variables(right, bound, out);
        }
        Expression::If {
            condition,
            then_branch,
            else_branch,
        } => {
            free_variables(condition, bound, out);
            free_variables(then_branch, bound, out);
            free_variables(else_branch, bound, out);
        }
        Expression::Tuple(items) | Expression::List(items) | Expression::Application(items) => {
            for item in items {
                free_variables(item, bound, out);
            }
        }
        Expression::Record(fields) => {
            for (_, value) in fields {
                free_variables(value, bound, out);
            }
        }
        Expression::RecordUpdate { name, fields } => {
            if !bound.iter().any(|b| b == name) {
                out.insert(name.clone());
            }
            for (_, value) in fields {
                free_variables(value, bound, out);
            }
        }
        Expression::Lambda { params, body } => {
            let depth = bound.len();
            for param in params.iter() {
                param.bound_names(bound);
            }
            free_variables(body, bound, out);
            bound.truncate(depth);
        }
        Expression::Let { declarations, body } => {
            let depth = bound.len();
            for decl in declarations {
                match decl {
                    LetDeclaration::Function { name, .. } => bound.push(name.clone()),
                    LetDeclaration::Destructuring { pattern, .. } => pattern.bound_names(bound),
                }
            }
            for decl in declarations {
                match decl {
                    LetDeclaration::Function { params, body, .. } => {
                        let inner_depth = bound.len();
                        for param in params {
                            param.bound_names(bound);
                        }
                        free_variables(body, bound, out);
                        bound.truncate(inner_depth);
                    }
                    LetDeclaration::Destructuring { body, .. } => {
                        free_variables(body, bound, out);
                    }
                }
            }
            free_variables(body, bound, out);
            bound.truncate(depth);
        }
        Expression::Case {
            scrutinee,
            branches,
        } => {
            free_variables(scrutinee, bound, out);
            for (pattern, body) in branches {
                let depth = bound.len();
                pattern.bound_names(bound);
                free_variables(body, bound, out);
                bound.truncate(depth);
            }
        }
        _ => {}
    }
}

/// Tarjan's algorithm; components come out in reverse topological order
/// of the condensation, i.e. a component is emitted only after every
/// component it points to.
struct Tarjan<'a> {
    graph: &'a [Vec<usize>],
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl<'a> Tarjan<'a> {
    fn run(graph: &'a [Vec<usize>]) -> Vec<Vec<usize>> {
        let count = graph.len();
        let mut tarjan = Tarjan {
            graph,
            index: vec![None; count],
            lowlink: vec![0; count],
            on_stack: vec![false; count],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        };
        for vertex in 0..count {
            if tarjan.index[vertex].is_none() {
                tarjan.connect(vertex);
            }
        }
        tarjan.components
    }

    fn connect(&mut self, vertex: usize) {
        self.index[vertex] = Some(self.next_index);
        self.lowlink[vertex] = self.next_index;
        self.next_index += 1;
        self.stack.push(vertex);
        self.on_stack[vertex] = true;

        for &target in &self.graph[vertex] {
            match self.index[target] {
                None => {
                    self.connect(target);
                    self.lowlink[vertex] = self.lowlink[vertex].min(self.lowlink[target]);
                }
                Some(target_index) if self.on_stack[target] => {
                    self.lowlink[vertex] = self.lowlink[vertex].min(target_index);
                }
                _ => {}
            }
        }

        if self.lowlink[vertex] == self.index[vertex].unwrap() {
            let mut component = Vec::new();
            loop {
                let member = self.stack.pop().unwrap();
                self.on_stack[member] = false;
                component.push(member);
                if member == vertex {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn function(name: &str, params: &[&str], body: Expression) -> LetDeclaration {
        LetDeclaration::Function {
            name: name.to_string(),
            params: params
                .iter()
                .map(|p| crate::ast::pattern::Pattern::Var(p.to_string()))
                .collect(),
            body: Rc::new(body),
        }
    }

    #[test]
    fn dependencies_come_first() {
        // a = b + 1 ; b = 2
        let decls = vec![
            function(
                "a",
                &[],
                Expression::BinaryOp {
                    op: "+".into(),
                    left: Rc::new(Expression::bare("b")),
                    right: Rc::new(Expression::Integer(1)),
                },
            ),
            function("b", &[], Expression::Integer(2)),
        ];
        let order = sort_declarations(&Env::new("Test"), &decls).unwrap();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn mutual_recursion_between_functions_is_legal() {
        let decls = vec![
            function(
                "even",
                &["n"],
                Expression::Application(vec![
                    Rc::new(Expression::bare("odd")),
                    Rc::new(Expression::bare("n")),
                ]),
            ),
            function(
                "odd",
                &["n"],
                Expression::Application(vec![
                    Rc::new(Expression::bare("even")),
                    Rc::new(Expression::bare("n")),
                ]),
            ),
        ];
        let order = sort_declarations(&Env::new("Test"), &decls).unwrap();
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn cycle_through_a_nullary_binding_is_illegal() {
        // x = y ; y = x
        let decls = vec![
            function("x", &[], Expression::bare("y")),
            function("y", &[], Expression::bare("x")),
        ];
        assert!(sort_declarations(&Env::new("Test"), &decls).is_err());
    }

    #[test]
    fn self_recursive_function_is_legal() {
        let decls = vec![function(
            "loop",
            &["n"],
            Expression::Application(vec![
                Rc::new(Expression::bare("loop")),
                Rc::new(Expression::bare("n")),
            ]),
        )];
        assert!(sort_declarations(&Env::new("Test"), &decls).is_ok());
    }
}
