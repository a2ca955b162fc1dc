//! Unit tests for semantic analysis.

use crate::{
    ast::{ast::Identifier, statements::StmtKind, types::SmclType},
    check_source,
    errors::errors::{Error, Violation},
    parse_source, Position, Span,
};

use super::{
    environment::{FunctionEnvironment, PartEnvironment, PartId, Scope},
    type_checker::{AnalyzerOptions, TypeChecker},
    typed_ast::{TypedExprKind, TypedProgram, TypedStmt, TypedStmtKind},
};

const VOTER: &str = "
declare client Voter {
    tunnel of sint vote;
    function sint ballot() { return readInt(); }
    function void cast() { vote.put(readInt()); }
}
";

fn check(source: &str) -> Result<TypedProgram, Error> {
    check_source(source, "test.smcl", AnalyzerOptions::default())
}

fn violation(source: &str) -> Violation {
    match check(source) {
        Ok(_) => panic!("expected a violation in:\n{}", source),
        Err(error) => error
            .get_violation()
            .cloned()
            .unwrap_or_else(|| panic!("expected a semantic error, got {}", error)),
    }
}

/// A program whose server `main` runs `body`.
fn server(body: &str) -> String {
    format!(
        "{}declare server Teller {{ group of Voter voters; function void main() {{ {} }} }}",
        VOTER, body
    )
}

/// A program whose client `main` runs `body`.
fn client(body: &str) -> String {
    format!(
        "declare client Voter {{ tunnel of sint vote; function void main() {{ {} }} }} declare server Teller {{ }}",
        body
    )
}

fn main_body(program: &TypedProgram) -> &[TypedStmt] {
    &program.server.functions[0].body
}

fn declared_type(stmt: &TypedStmt) -> SmclType {
    match &stmt.kind {
        TypedStmtKind::Declaration { value: Some(value), .. } => value.ty.clone(),
        other => panic!("expected an initialised declaration, got {:?}", other),
    }
}

#[test]
fn test_valid_program() {
    let program = check(&server(
        "sint total = readInt();
         for (client c in voters) {
             total = c.vote.take();
         }
         if (open(total > 10 | total)) display(\"majority\");",
    ))
    .unwrap();

    assert_eq!(program.clients[0].name, "Voter");
    assert_eq!(program.clients[0].tunnels[0].ty, SmclType::Sint);
    assert_eq!(program.server.groups[0].alias, "voters");
    assert_eq!(main_body(&program).len(), 3);
}

#[test]
fn test_duplicate_function() {
    let source = format!(
        "{}declare server Teller {{ function void f() {{ }} function void f() {{ }} }}",
        VOTER
    );

    assert!(matches!(
        violation(&source),
        Violation::DuplicateFunction { function, part } if function == "f" && part == "Teller"
    ));
}

#[test]
fn test_same_function_name_in_different_parts() {
    let source = format!("{}declare server Teller {{ function void cast() {{ }} }}", VOTER);
    assert!(check(&source).is_ok());
}

#[test]
fn test_client_functions_cannot_use_tunnel_operation_names() {
    for name in ["put", "get", "take"] {
        let source = format!(
            "declare client Voter {{ function int {}() {{ return 1; }} }} declare server Teller {{ }}",
            name
        );
        assert!(matches!(
            violation(&source),
            Violation::ReservedFunctionName { function, part } if function == name && part == "Voter"
        ));
    }

    let server_side = "declare server Teller { function int get() { return 1; } function void main() { int x = get(); } }";
    assert!(check(server_side).is_ok());
}

#[test]
fn test_duplicate_client() {
    let source = format!("{}{}declare server Teller {{ }}", VOTER, VOTER);
    assert!(matches!(violation(&source), Violation::DuplicatePart { part } if part == "Voter"));
}

#[test]
fn test_arithmetic_yields_public_int() {
    let program = check(&server(
        "sint s = readInt();
         int a = s + 1;
         int b = 1 * s;
         int c = s % s;
         int d = 4 - 2 / 1;",
    ))
    .unwrap();

    for stmt in &main_body(&program)[1..] {
        assert_eq!(declared_type(stmt), SmclType::Int);
    }
}

#[test]
fn test_arithmetic_result_cannot_be_secret() {
    assert!(matches!(
        violation(&server("sint s = 1 + 2;")),
        Violation::AssignmentMismatch { expected: SmclType::Sint, received: SmclType::Int, .. }
    ));
}

#[test]
fn test_arithmetic_operand_types() {
    match violation(&server("int x = 1 + true;")) {
        Violation::OperandType { operator, position, expected, received } => {
            assert_eq!(operator, "+");
            assert_eq!(position, "right");
            assert_eq!(expected, SmclType::Int);
            assert_eq!(received, SmclType::Bool);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_logical_and_relational_operators() {
    let program = check(&server(
        "sint s = readInt();
         bool a = s > 1 and true;
         bool b = not (s < 2) or false;",
    ))
    .unwrap();

    assert_eq!(declared_type(&main_body(&program)[1]), SmclType::Bool);
    assert_eq!(declared_type(&main_body(&program)[2]), SmclType::Bool);

    assert!(matches!(violation(&server("bool b = 1 and true;")), Violation::OperandType { .. }));
    assert!(matches!(violation(&server("bool b = not 1;")), Violation::OperandType { .. }));
    assert!(matches!(violation(&server("bool b = true < 1;")), Violation::OperandType { .. }));
}

#[test]
fn test_equality_is_asymmetric() {
    assert!(check(&server("sint s = readInt(); int i = 1; bool b = s == i;")).is_ok());

    assert!(matches!(
        violation(&server("sint s = readInt(); int i = 1; bool b = i == s;")),
        Violation::EqualityMismatch { left: SmclType::Int, right: SmclType::Sint }
    ));
}

#[test]
fn test_for_over_undeclared_group() {
    assert!(matches!(
        violation(&server("for (client c in nobody) { }")),
        Violation::UndefinedGroup { group } if group == "nobody"
    ));
}

#[test]
fn test_loop_variable_is_scoped_to_the_body() {
    assert!(check(&server("for (client c in voters) { sint v = c.ballot(); }")).is_ok());

    assert!(matches!(
        violation(&server("for (client c in voters) { } sint v = c.ballot();")),
        Violation::UnboundClient { variable } if variable == "c"
    ));
    assert!(matches!(
        violation(&server("for (client c in voters) { } client d = c;")),
        Violation::UndefinedVariable { variable } if variable == "c"
    ));
}

#[test]
fn test_loop_variable_can_be_reused() {
    assert!(check(&server(
        "for (client c in voters) { c.cast(); } for (client c in voters) { c.cast(); }"
    ))
    .is_ok());
}

#[test]
fn test_loop_variable_must_be_fresh() {
    assert!(matches!(
        violation(&server("client c; for (client c in voters) { }")),
        Violation::DuplicateVariable { variable } if variable == "c"
    ));
    assert!(matches!(
        violation(&server("for (client voters in voters) { }")),
        Violation::ShadowsGroup { .. }
    ));
}

#[test]
fn test_loop_variable_must_be_client() {
    assert!(matches!(
        violation(&server("for (sclient c in voters) { }")),
        Violation::LoopVariableType { received: SmclType::Sclient }
    ));
}

#[test]
fn test_for_records_the_client() {
    let program = check(&server("for (client c in voters) { c.cast(); }")).unwrap();

    match &main_body(&program)[0].kind {
        TypedStmtKind::For { variable, group, client, .. } => {
            assert_eq!(variable, "c");
            assert_eq!(group, "voters");
            assert_eq!(client, "Voter");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_open_requires_secret() {
    assert!(matches!(
        violation(&server("int i = 1; bool b = open(i > 0 | i);")),
        Violation::NotSecret { variable, received: SmclType::Int } if variable == "i"
    ));
    assert!(matches!(
        violation(&server("bool b = open(true | missing);")),
        Violation::UndefinedVariable { variable } if variable == "missing"
    ));
}

#[test]
fn test_open_is_public_inside_and_secret_after() {
    let program = check(&server("sint s = readInt(); int p = open(s | s);")).unwrap();
    assert_eq!(declared_type(&main_body(&program)[1]), SmclType::Int);

    assert!(matches!(
        violation(&server("sint s = readInt(); int p = open(s | s); int q = s;")),
        Violation::AssignmentMismatch { expected: SmclType::Int, received: SmclType::Sint, .. }
    ));
}

#[test]
fn test_open_several_variables() {
    assert!(check(&server(
        "sint a = readInt(); sint b = readInt(); bool r = open(a > b | a, b);"
    ))
    .is_ok());
}

#[test]
fn test_open_restores_types_on_failure() {
    let program = parse_source(
        "declare server S { function void main(sint s) { } }",
        "test.smcl",
    )
    .unwrap();
    let function = &program.server.functions[0];

    let mut type_checker = TypeChecker::new(AnalyzerOptions::default());
    let mut server = PartEnvironment::server("S");
    server
        .functions
        .insert(String::from("main"), FunctionEnvironment::new(function));
    type_checker.environment.server = Some(server);

    let scope = Scope::new(PartId::Server, "main");
    type_checker.declare(&scope, &function.parameters[0]).unwrap();

    let ids = vec![Identifier::new("s", Span::null())];
    let result: Result<(), Error> = type_checker.with_opened(scope, &ids, |type_checker| {
        assert_eq!(
            type_checker.function(&scope).unwrap().symbol_table["s"],
            SmclType::Int
        );
        Err(Error::semantic(
            Violation::DisplayType { received: SmclType::Int },
            Position::null(),
        ))
    });

    assert!(result.is_err());
    assert_eq!(
        type_checker.function(&scope).unwrap().symbol_table["s"],
        SmclType::Sint
    );
}

#[test]
fn test_loop_binding_restored_on_failure() {
    let program = parse_source(
        "declare server S { function void main() { for (client c in g) { } } }",
        "test.smcl",
    )
    .unwrap();
    let function = &program.server.functions[0];
    let StmtKind::For { variable, .. } = &function.body[0].kind else {
        panic!("expected a for loop");
    };

    let mut type_checker = TypeChecker::new(AnalyzerOptions::default());
    let mut server = PartEnvironment::server("S");
    server
        .functions
        .insert(String::from("main"), FunctionEnvironment::new(function));
    type_checker.environment.server = Some(server);

    let scope = Scope::new(PartId::Server, "main");
    let result: Result<(), Error> = type_checker.with_loop_binding(scope, variable, 0, |type_checker| {
        assert_eq!(type_checker.function(&scope).unwrap().id_to_client["c"], 0);
        Err(Error::semantic(
            Violation::UnboundClient { variable: String::from("d") },
            Position::null(),
        ))
    });

    assert!(result.is_err());
    let function = type_checker.function(&scope).unwrap();
    assert!(function.symbol_table.is_empty());
    assert!(function.id_to_client.is_empty());
}

#[test]
fn test_server_cannot_put_into_remote_tunnel() {
    assert!(matches!(
        violation(&server("for (client c in voters) { c.vote.put(readInt()); }")),
        Violation::IllegalTunnelDirection { tunnel } if tunnel == "vote"
    ));
}

#[test]
fn test_remote_tunnel_reads() {
    let program = check(&server(
        "for (client c in voters) { sint a = c.vote.take(); sint b = c.vote.get(); }",
    ))
    .unwrap();

    let TypedStmtKind::For { body, .. } = &main_body(&program)[0].kind else {
        panic!("expected a for loop");
    };
    let TypedStmtKind::Block(body) = &body.kind else {
        panic!("expected a block");
    };
    assert_eq!(declared_type(&body[0]), SmclType::Sint);

    match &body[0].kind {
        TypedStmtKind::Declaration { value: Some(value), .. } => {
            assert!(matches!(
                &value.kind,
                TypedExprKind::RemoteTunnel { target, client, .. } if target == "c" && client == "Voter"
            ));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_remote_tunnel_errors() {
    assert!(matches!(
        violation(&server("sint a = c.vote.take();")),
        Violation::UnboundClient { .. }
    ));
    assert!(matches!(
        violation(&server("for (client c in voters) { sint a = c.ballots.take(); }")),
        Violation::UndefinedTunnel { tunnel, part } if tunnel == "ballots" && part == "Voter"
    ));
    assert!(matches!(
        violation(&client("sint a = c.vote.take();")),
        Violation::OutsideServer { .. }
    ));
}

#[test]
fn test_local_tunnel_operations() {
    assert!(check(&client("vote.put(readInt()); sint a = vote.take(); sint b = vote.get();")).is_ok());

    assert!(matches!(
        violation(&client("vote.put(1);")),
        Violation::TunnelMismatch { expected: SmclType::Sint, received: SmclType::Int, .. }
    ));
    assert!(matches!(
        violation(&client("votes.put(readInt());")),
        Violation::UndefinedTunnel { .. }
    ));
    assert!(matches!(
        violation(&server("vote.put(readInt());")),
        Violation::OutsideClient { .. }
    ));
}

#[test]
fn test_tunnel_put_is_void() {
    assert!(matches!(
        violation(&client("int x = vote.put(readInt());")),
        Violation::AssignmentMismatch { received: SmclType::Void, .. }
    ));
}

#[test]
fn test_tunnel_types_are_restricted() {
    let source = "declare client A { tunnel of string names; } declare server S { }";
    assert!(matches!(
        violation(source),
        Violation::UnsupportedTunnelType { received: SmclType::String, .. }
    ));

    for ty in ["int", "sint", "bool", "sbool"] {
        let source = format!("declare client A {{ tunnel of {} t; }} declare server S {{ }}", ty);
        assert!(check(&source).is_ok(), "tunnel of {} should be accepted", ty);
    }
}

#[test]
fn test_duplicate_tunnel() {
    let source = "declare client A { tunnel of int t; tunnel of sint t; } declare server S { }";
    assert!(matches!(violation(source), Violation::DuplicateTunnel { .. }));
}

#[test]
fn test_groups() {
    let duplicate = format!(
        "{}declare server Teller {{ group of Voter voters; group of Voter voters; }}",
        VOTER
    );
    assert!(matches!(
        violation(&duplicate),
        Violation::DuplicateGroup { group, .. } if group == "voters"
    ));

    let unknown = "declare server Teller { group of Voter voters; }";
    assert!(matches!(
        violation(unknown),
        Violation::UndefinedPart { part } if part == "Voter"
    ));

    let aliases = format!(
        "{}declare server Teller {{ group of Voter voters; group of Voter others; }}",
        VOTER
    );
    assert!(check(&aliases).is_ok());
}

#[test]
fn test_server_only_constructs() {
    assert!(matches!(
        violation(&client("for (client c in voters) { }")),
        Violation::OutsideServer { construct } if construct == "for loops"
    ));
    assert!(matches!(
        violation(&client("sint s = readInt(); int p = open(s | s);")),
        Violation::OutsideServer { construct } if construct == "open"
    ));
    assert!(matches!(
        violation(&client("c.main();")),
        Violation::OutsideServer { .. }
    ));
}

#[test]
fn test_method_invocation() {
    let program = check(&server("for (client c in voters) { sint v = c.ballot(); }")).unwrap();
    assert!(program.server.functions[0].body.len() == 1);

    assert!(matches!(
        violation(&server("for (client c in voters) { c.missing(); }")),
        Violation::UndefinedFunction { function, part } if function == "missing" && part == "Voter"
    ));
    assert!(matches!(
        violation(&server("for (client c in voters) { int v = c.ballot(); }")),
        Violation::AssignmentMismatch { .. }
    ));
}

#[test]
fn test_method_arguments_checked_in_caller() {
    let source = "declare client Voter { function void give(int weight) { } }
        declare server Teller {
            group of Voter voters;
            function void main() {
                int w = 2;
                for (client c in voters) { c.give(w); }
            }
        }";
    assert!(check(source).is_ok());
}

#[test]
fn test_method_arguments_keep_secrets() {
    let source = |declaration: &str| {
        format!(
            "declare client Voter {{ function void give({} weight) {{ }} }}
            declare server Teller {{
                group of Voter voters;
                function void main() {{
                    sint w = readInt();
                    for (client c in voters) {{ c.give(w); }}
                }}
            }}",
            declaration
        )
    };

    assert!(check(&source("sint")).is_ok());
    assert!(matches!(
        violation(&source("int")),
        Violation::ArgumentMismatch { function, position: 1, expected: SmclType::Int, received: SmclType::Sint }
            if function == "give"
    ));
}

#[test]
fn test_call_arity_and_arguments() {
    let source = |body: &str| {
        format!(
            "declare server S {{
                function void secret(sint a) {{ }}
                function void public(int a) {{ }}
                function void main() {{ {} }}
            }}",
            body
        )
    };

    assert!(check(&source("secret(readInt()); secret(1); public(1);")).is_ok());

    assert!(matches!(
        violation(&source("public(readInt());")),
        Violation::ArgumentMismatch { position: 1, expected: SmclType::Int, received: SmclType::Sint, .. }
    ));
    assert!(matches!(
        violation(&source("public(1, 2);")),
        Violation::ArityMismatch { expected: 1, received: 2, .. }
    ));
}

#[test]
fn test_call_result_type() {
    let source = "declare server S {
        function sint twice(sint x) { return x; }
        function void main() { sint y = twice(readInt()); }
    }";
    assert!(check(source).is_ok());
}

#[test]
fn test_functions_must_be_declared_before_use() {
    let forward = "declare server S {
        function void a() { b(); }
        function void b() { }
    }";
    assert!(matches!(
        violation(forward),
        Violation::UndefinedFunction { function, .. } if function == "b"
    ));

    let recursive = "declare server S { function void a() { a(); } }";
    assert!(check(recursive).is_ok());
}

#[test]
fn test_return_types() {
    assert!(check("declare server S { function void f() { return; } }").is_ok());
    assert!(check("declare server S { function int f() { return 1; } }").is_ok());

    assert!(matches!(
        violation("declare server S { function int f() { return; } }"),
        Violation::ReturnMismatch { expected: SmclType::Int, received: SmclType::Void, .. }
    ));
    assert!(matches!(
        violation("declare server S { function int f() { return readInt(); } }"),
        Violation::ReturnMismatch { expected: SmclType::Int, received: SmclType::Sint, .. }
    ));
}

#[test]
fn test_read_int_is_secret() {
    let program = check(&server("sint s = readInt();")).unwrap();
    assert_eq!(declared_type(&main_body(&program)[0]), SmclType::Sint);
}

#[test]
fn test_display() {
    assert!(check(&server("display(1); display(readInt()); display(\"text\");")).is_ok());

    let strict = AnalyzerOptions { strict_display: true };
    assert!(check_source(&server("display(\"text\");"), "test.smcl", strict).is_ok());

    let error = check_source(&server("display(1);"), "test.smcl", strict).unwrap_err();
    assert!(matches!(
        error.get_violation(),
        Some(Violation::DisplayType { received: SmclType::Int })
    ));
}

#[test]
fn test_guards() {
    assert!(check(&server("sint s = readInt(); if (s > 0) { } while (false) { }")).is_ok());
    assert!(check(&server("sbool b; if (b) { }")).is_ok());

    assert!(matches!(
        violation(&server("if (1) { }")),
        Violation::ConditionType { construct, received: SmclType::Int } if construct == "if"
    ));
    assert!(matches!(
        violation(&server("while (\"yes\") { }")),
        Violation::ConditionType { construct, .. } if construct == "while"
    ));
}

#[test]
fn test_declarations() {
    assert!(matches!(
        violation(&server("int x; int x;")),
        Violation::DuplicateVariable { variable } if variable == "x"
    ));
    assert!(matches!(
        violation(&client("int vote;")),
        Violation::ShadowsTunnel { variable } if variable == "vote"
    ));
    assert!(matches!(
        violation(&server("int voters;")),
        Violation::ShadowsGroup { variable } if variable == "voters"
    ));
    assert!(matches!(
        violation("declare server S { function void f(int a, sint a) { } }"),
        Violation::DuplicateVariable { .. }
    ));
}

#[test]
fn test_declaration_initialiser_sees_the_new_name() {
    assert!(matches!(
        violation(&server("int x = y;")),
        Violation::UndefinedVariable { variable } if variable == "y"
    ));
    assert!(check(&server("int x = 1; int y = x;")).is_ok());
}

#[test]
fn test_assignments() {
    assert!(check(&server("sint s; s = readInt();")).is_ok());
    assert!(matches!(
        violation(&server("x = 1;")),
        Violation::UndefinedVariable { .. }
    ));
    assert!(matches!(
        violation(&server("int i; i = readInt();")),
        Violation::AssignmentMismatch { expected: SmclType::Int, received: SmclType::Sint, .. }
    ));
    assert!(matches!(
        violation(&server("sbool b = true;")),
        Violation::AssignmentMismatch { .. }
    ));
}

#[test]
fn test_blocks_do_not_scope() {
    assert!(check(&server("{ int x = 1; } x = 2;")).is_ok());
    assert!(matches!(
        violation(&server("{ int x = 1; } int x = 2;")),
        Violation::DuplicateVariable { .. }
    ));
}

#[test]
fn test_names_resolve_to_parts() {
    let program = check(&server("display(voters);")).unwrap();
    match &main_body(&program)[0].kind {
        TypedStmtKind::Display(value) => assert_eq!(value.ty, SmclType::Group),
        other => panic!("unexpected {:?}", other),
    }

    let program = check(&client("display(vote);")).unwrap();
    match &program.clients[0].functions[0].body[0].kind {
        TypedStmtKind::Display(value) => {
            assert_eq!(value.ty, SmclType::Tunnel(Box::new(SmclType::Sint)))
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_undefined_variable() {
    assert!(matches!(
        violation(&server("display(nothing);")),
        Violation::UndefinedVariable { variable } if variable == "nothing"
    ));
}

#[test]
fn test_variables_are_per_function() {
    let source = "declare server S {
        function void a() { int x = 1; }
        function void b() { x = 2; }
    }";
    assert!(matches!(violation(source), Violation::UndefinedVariable { .. }));
}

#[test]
fn test_error_points_at_offending_expression() {
    let source = server("int i; i = readInt();");
    let error = check(&source).unwrap_err();

    let offset = source.rfind("readInt();").unwrap();
    assert_eq!(error.get_position().0 as usize, offset);
}

#[test]
fn test_analysis_is_deterministic() {
    let source = server(
        "sint total = readInt();
         for (client c in voters) { total = c.ballot(); }
         int result = open(total | total);
         display(result);",
    );

    assert_eq!(check(&source).unwrap(), check(&source).unwrap());
}
