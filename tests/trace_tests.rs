use larch::{eval, trace, CallKind, CallTree, Value};

fn count_nodes(trees: &[CallTree], predicate: &dyn Fn(&CallTree) -> bool) -> usize {
    trees
        .iter()
        .map(|tree| {
            let here = usize::from(predicate(tree));
            here + count_nodes(&tree.children, predicate)
        })
        .sum()
}

#[test]
fn tracing_records_what_plain_eval_does_not() {
    assert_eq!(eval("1 + 2").unwrap(), Value::Int(3));
    let (result, trees) = trace("1 + 2");
    assert_eq!(result.unwrap(), Value::Int(3));
    assert!(!trees.is_empty());
}

#[test]
fn the_root_is_the_entry_application() {
    let (result, trees) = trace("2 + 3");
    assert_eq!(result.unwrap(), Value::Int(5));
    assert_eq!(trees.len(), 1);
    let root = &trees[0];
    assert_eq!(root.kind, CallKind::Application);
    assert_eq!(root.name.to_string(), "Main.main");
    assert_eq!(root.result, Ok(Value::Int(5)));
}

#[test]
fn caf_reduction_and_kernel_dispatch_are_recorded() {
    let (_, trees) = trace("2 + 3");
    let root = &trees[0];
    assert_eq!(root.children.len(), 1);
    let main = &root.children[0];
    assert_eq!(main.kind, CallKind::EvalFunction);
    assert_eq!(main.name.to_string(), "Main.main");
    assert_eq!(main.result, Ok(Value::Int(5)));

    let kernels = count_nodes(&main.children, &|node| {
        node.kind == CallKind::EvalKernelFunction
            && node.name.to_string() == "Larch.Kernel.Basics.add"
            && node.args == vec![Value::Int(2), Value::Int(3)]
    });
    assert_eq!(kernels, 1);
}

#[test]
fn user_function_calls_appear_with_their_arguments() {
    let (result, trees) =
        trace("let fib n = if n <= 2 then 1 else fib (n - 1) + fib (n - 2) in fib 7");
    assert_eq!(result.unwrap(), Value::Int(13));
    let calls = count_nodes(&trees, &|node| {
        node.kind == CallKind::Call && node.name.to_string() == "Main.fib"
    });
    // fib is called once per node of the call tree of fib 7.
    assert!(calls > 10, "expected many fib calls, saw {calls}");
    let top_call = count_nodes(&trees, &|node| {
        node.kind == CallKind::Call
            && node.name.to_string() == "Main.fib"
            && node.args == vec![Value::Int(7)]
    });
    assert_eq!(top_call, 1);
}

#[test]
fn tail_calls_nest_and_share_the_final_result() {
    let (result, trees) = trace("let go n = if n == 0 then 99 else go (n - 1) in go 3");
    assert_eq!(result.unwrap(), Value::Int(99));
    // Every frame of the tail chain reports the chain's result.
    let sharing = count_nodes(&trees, &|node| {
        node.kind == CallKind::Call
            && node.name.to_string() == "Main.go"
            && node.result == Ok(Value::Int(99))
    });
    assert_eq!(sharing, 4);
}

#[test]
fn partial_trees_survive_errors() {
    let (result, trees) = trace(r#"1 + Debug.todo "boom""#);
    assert!(result.is_err());
    assert_eq!(trees.len(), 1);
    assert!(trees[0].result.is_err());
    let todos = count_nodes(&trees, &|node| {
        node.kind == CallKind::EvalKernelFunction && node.name.name == "todo" && node.result.is_err()
    });
    assert_eq!(todos, 1);
}

#[test]
fn higher_order_kernels_trace_their_callbacks() {
    let (result, trees) = trace("List.map (\\x -> x + 1) [1, 2]");
    assert_eq!(result.unwrap(), Value::List(vec![Value::Int(2), Value::Int(3)]));
    let adds = count_nodes(&trees, &|node| {
        node.kind == CallKind::EvalKernelFunction && node.name.name == "add"
    });
    assert_eq!(adds, 2);
}
