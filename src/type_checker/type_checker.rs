use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Client, Function, Group, Identifier, Program, Server, Tunnel, Typed},
        expressions::{BinaryOperator, Call, Expr, ExprKind, TunnelCall, TunnelMethod},
        statements::{Assignment, Stmt, StmtKind},
        types::SmclType,
    },
    errors::errors::{Error, Violation},
    Position,
};

use super::{
    environment::{FunctionEnvironment, GlobalEnvironment, PartEnvironment, PartId, PartKind, Scope},
    typed_ast::{
        TypedCall, TypedClient, TypedExpr, TypedExprKind, TypedFunction, TypedGroup, TypedParameter,
        TypedProgram, TypedServer, TypedStmt, TypedStmtKind, TypedTunnel, TypedTunnelCall,
        TypedTunnelMethod,
    },
};

/// Knobs for the analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Only accept `string` expressions in `display(...)`.
    pub strict_display: bool,
}

#[derive(Debug)]
pub struct TypeChecker<'a> {
    pub environment: GlobalEnvironment<'a>,
    pub options: AnalyzerOptions,
}

impl<'a> TypeChecker<'a> {
    pub fn new(options: AnalyzerOptions) -> Self {
        TypeChecker {
            environment: GlobalEnvironment::default(),
            options,
        }
    }

    pub fn part(&self, id: PartId) -> Result<&PartEnvironment<'a>, Error> {
        self.environment.part(id).ok_or_else(|| unregistered_part(id))
    }

    pub fn function(&self, scope: &Scope) -> Result<&FunctionEnvironment<'a>, Error> {
        self.environment
            .function(scope)
            .ok_or_else(|| unregistered_function(scope))
    }

    pub fn function_mut(&mut self, scope: &Scope) -> Result<&mut FunctionEnvironment<'a>, Error> {
        self.environment
            .function_mut(scope)
            .ok_or_else(|| unregistered_function(scope))
    }

    /// Registers `typed` in the current function.
    ///
    /// The name must be new to the function and must not be taken by a
    /// tunnel or group of the current part.
    pub fn declare(&mut self, scope: &Scope, typed: &Typed) -> Result<(), Error> {
        let name = &typed.name.name;
        let position = typed.name.span.start.clone();

        let part = self.part(scope.part)?;
        if part.tunnel(name).is_some() {
            return Err(Error::semantic(
                Violation::ShadowsTunnel { variable: name.clone() },
                position,
            ));
        }
        if part.group(name).is_some() {
            return Err(Error::semantic(
                Violation::ShadowsGroup { variable: name.clone() },
                position,
            ));
        }

        let function = self.function_mut(scope)?;
        if function.symbol_table.contains_key(name) {
            return Err(Error::semantic(
                Violation::DuplicateVariable { variable: name.clone() },
                position,
            ));
        }

        function.symbol_table.insert(name.clone(), typed.ty.clone());
        Ok(())
    }

    /// Type of an identifier used as an expression.
    ///
    /// Group aliases and tunnel names of the current part win over symbols.
    pub fn resolve_identifier(&self, scope: &Scope, name: &str, position: Position) -> Result<SmclType, Error> {
        let part = self.part(scope.part)?;
        if part.group(name).is_some() {
            return Ok(SmclType::Group);
        }
        if let Some(inner) = part.tunnel(name) {
            return Ok(SmclType::Tunnel(Box::new(inner.clone())));
        }

        self.function(scope)?
            .symbol_table
            .get(name)
            .cloned()
            .ok_or_else(|| {
                Error::semantic(
                    Violation::UndefinedVariable { variable: name.to_string() },
                    position,
                )
            })
    }

    /// Client a loop variable is bound to.
    pub fn bound_client(&self, scope: &Scope, target: &Identifier) -> Result<usize, Error> {
        self.function(scope)?
            .id_to_client
            .get(&target.name)
            .copied()
            .ok_or_else(|| {
                Error::semantic(
                    Violation::UnboundClient { variable: target.name.clone() },
                    target.span.start.clone(),
                )
            })
    }

    /// Runs `check` with `variable` bound to `client`, unbinding it afterwards
    /// whatever `check` returns.
    pub fn with_loop_binding<T>(
        &mut self,
        scope: Scope<'a>,
        variable: &Typed,
        client: usize,
        check: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let name = &variable.name.name;

        self.declare(&scope, variable)?;
        self.function_mut(&scope)?
            .id_to_client
            .insert(name.clone(), client);
        trace!(variable = %name, client, "bound loop variable");

        let result = check(self);

        if let Ok(function) = self.function_mut(&scope) {
            function.symbol_table.remove(name);
            function.id_to_client.remove(name);
        }
        trace!(variable = %name, "unbound loop variable");

        result
    }

    /// Runs `check` with every id in `ids` rewritten to its public type, then
    /// rewrites them back whatever `check` returns.
    pub fn with_opened<T>(
        &mut self,
        scope: Scope<'a>,
        ids: &[Identifier],
        check: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut opened = Vec::with_capacity(ids.len());
        let mut failure = None;

        for id in ids {
            match self.open_symbol(&scope, id) {
                Ok(secret) => opened.push((id.name.clone(), secret)),
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }
        }

        let result = match failure {
            Some(error) => Err(error),
            None => check(self),
        };

        if let Ok(function) = self.function_mut(&scope) {
            for (name, secret) in opened.into_iter().rev() {
                trace!(variable = %name, ty = %secret, "closed");
                function.symbol_table.insert(name, secret);
            }
        }

        result
    }

    /// Rewrites a secret symbol to its public type, returning the secret one.
    fn open_symbol(&mut self, scope: &Scope, id: &Identifier) -> Result<SmclType, Error> {
        let function = self.function_mut(scope)?;
        let Some(ty) = function.symbol_table.get_mut(&id.name) else {
            return Err(Error::semantic(
                Violation::UndefinedVariable { variable: id.name.clone() },
                id.span.start.clone(),
            ));
        };

        if !ty.is_secret() {
            return Err(Error::semantic(
                Violation::NotSecret {
                    variable: id.name.clone(),
                    received: ty.clone(),
                },
                id.span.start.clone(),
            ));
        }

        let public = ty.public_of();
        let secret = std::mem::replace(ty, public);
        trace!(variable = %id.name, ty = %secret, "opened");

        Ok(secret)
    }
}

fn unregistered_part(id: PartId) -> Error {
    let part = match id {
        PartId::Client(index) => format!("client #{}", index),
        PartId::Server => String::from("server"),
    };
    Error::semantic(Violation::UndefinedPart { part }, Position::null())
}

fn unregistered_function(scope: &Scope) -> Error {
    Error::semantic(
        Violation::UndefinedFunction {
            function: scope.function.to_string(),
            part: format!("{:?}", scope.part),
        },
        Position::null(),
    )
}

fn require_server(scope: &Scope, construct: &str, position: &Position) -> Result<(), Error> {
    if scope.part == PartId::Server {
        Ok(())
    } else {
        Err(Error::semantic(
            Violation::OutsideServer { construct: construct.to_string() },
            position.clone(),
        ))
    }
}

fn expect_operand(operator: &str, position: &str, operand: &TypedExpr, expected: SmclType) -> Result<(), Error> {
    if operand.ty.compatible(&expected) {
        return Ok(());
    }

    Err(Error::semantic(
        Violation::OperandType {
            operator: operator.to_string(),
            position: position.to_string(),
            expected,
            received: operand.ty.clone(),
        },
        operand.span.start.clone(),
    ))
}

/// Result type of a binary operation.
///
/// Arithmetic yields a public `int` even over secret operands.
fn type_check_binary(operator: BinaryOperator, left: &TypedExpr, right: &TypedExpr) -> Result<SmclType, Error> {
    if operator == BinaryOperator::Equal {
        if left.ty.compatible(&right.ty) {
            return Ok(SmclType::Bool);
        }

        return Err(Error::semantic(
            Violation::EqualityMismatch {
                left: left.ty.clone(),
                right: right.ty.clone(),
            },
            right.span.start.clone(),
        ));
    }

    let (operand, result) = if operator.is_arithmetic() {
        (SmclType::Int, SmclType::Int)
    } else if operator.is_logical() {
        (SmclType::Bool, SmclType::Bool)
    } else {
        (SmclType::Int, SmclType::Bool)
    };

    let symbol = operator.to_string();
    expect_operand(&symbol, "left", left, operand.clone())?;
    expect_operand(&symbol, "right", right, operand)?;

    Ok(result)
}

fn type_check_call<'a>(
    type_checker: &mut TypeChecker<'a>,
    scope: Scope<'a>,
    call: &'a Call,
) -> Result<(TypedCall, SmclType), Error> {
    let name = &call.name.name;
    let target = type_checker.part(scope.call_target())?;

    let Some(callee) = target.functions.get(name) else {
        return Err(Error::semantic(
            Violation::UndefinedFunction {
                function: name.clone(),
                part: target.name.clone(),
            },
            call.name.span.start.clone(),
        ));
    };
    let callee: &'a Function = callee.function;

    if callee.parameters.len() != call.arguments.len() {
        return Err(Error::semantic(
            Violation::ArityMismatch {
                function: name.clone(),
                expected: callee.parameters.len(),
                received: call.arguments.len(),
            },
            call.span.start.clone(),
        ));
    }

    let caller = scope.caller();
    let mut arguments = Vec::with_capacity(call.arguments.len());

    for (index, (argument, parameter)) in call.arguments.iter().zip(&callee.parameters).enumerate() {
        let argument = type_check_expr(type_checker, caller, argument)?;

        // A secret parameter takes a public argument, never the reverse.
        if !parameter.ty.compatible(&argument.ty) {
            return Err(Error::semantic(
                Violation::ArgumentMismatch {
                    function: name.clone(),
                    position: index + 1,
                    expected: parameter.ty.clone(),
                    received: argument.ty.clone(),
                },
                argument.span.start.clone(),
            ));
        }

        arguments.push(argument);
    }

    Ok((
        TypedCall {
            function: name.clone(),
            arguments,
        },
        callee.return_type.clone(),
    ))
}

/// Checks a tunnel operation against the tunnels of `owner`.
///
/// A value being put is checked in `scope`.
fn type_check_tunnel_call<'a>(
    type_checker: &mut TypeChecker<'a>,
    scope: Scope<'a>,
    owner: PartId,
    call: &'a TunnelCall,
) -> Result<(TypedTunnelCall, SmclType), Error> {
    let tunnel = &call.tunnel.name;
    let owner = type_checker.part(owner)?;

    let Some(inner) = owner.tunnel(tunnel).cloned() else {
        return Err(Error::semantic(
            Violation::UndefinedTunnel {
                tunnel: tunnel.clone(),
                part: owner.name.clone(),
            },
            call.tunnel.span.start.clone(),
        ));
    };

    let (method, ty) = match &call.method {
        TunnelMethod::Put(value) => {
            let value = type_check_expr(type_checker, scope, value)?;

            if value.ty != inner {
                return Err(Error::semantic(
                    Violation::TunnelMismatch {
                        tunnel: tunnel.clone(),
                        expected: inner,
                        received: value.ty.clone(),
                    },
                    value.span.start.clone(),
                ));
            }

            (TypedTunnelMethod::Put(Box::new(value)), SmclType::Void)
        }
        TunnelMethod::Get => (TypedTunnelMethod::Get, inner),
        TunnelMethod::Take => (TypedTunnelMethod::Take, inner),
    };

    Ok((
        TypedTunnelCall {
            tunnel: tunnel.clone(),
            method,
        },
        ty,
    ))
}

pub fn type_check_expr<'a>(
    type_checker: &mut TypeChecker<'a>,
    scope: Scope<'a>,
    expr: &'a Expr,
) -> Result<TypedExpr, Error> {
    let position = &expr.span.start;

    let (kind, ty) = match &expr.kind {
        ExprKind::Int(value) => (TypedExprKind::Int(*value), SmclType::Int),
        ExprKind::Bool(value) => (TypedExprKind::Bool(*value), SmclType::Bool),
        ExprKind::String(value) => (TypedExprKind::String(value.clone()), SmclType::String),
        ExprKind::Symbol(name) => {
            let ty = type_checker.resolve_identifier(&scope, name, position.clone())?;
            (TypedExprKind::Symbol(name.clone()), ty)
        }
        ExprKind::Binary { operator, left, right } => {
            let left = type_check_expr(type_checker, scope, left)?;
            let right = type_check_expr(type_checker, scope, right)?;
            let ty = type_check_binary(*operator, &left, &right)?;

            (
                TypedExprKind::Binary {
                    operator: *operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                ty,
            )
        }
        ExprKind::Not(operand) => {
            let operand = type_check_expr(type_checker, scope, operand)?;
            expect_operand("not", "only", &operand, SmclType::Bool)?;

            (TypedExprKind::Not(Box::new(operand)), SmclType::Bool)
        }
        ExprKind::Call(call) => {
            let (call, ty) = type_check_call(type_checker, scope, call)?;
            (TypedExprKind::Call(call), ty)
        }
        ExprKind::MethodInvocation { target, call } => {
            require_server(&scope, "method invocations", position)?;
            let client = type_checker.bound_client(&scope, target)?;

            let (call, ty) = type_check_call(type_checker, scope.invoking(client), call)?;
            (
                TypedExprKind::MethodInvocation {
                    target: target.name.clone(),
                    client: type_checker.part(PartId::Client(client))?.name.clone(),
                    call,
                },
                ty,
            )
        }
        ExprKind::Tunnel(call) => {
            if scope.part == PartId::Server {
                return Err(Error::semantic(
                    Violation::OutsideClient {
                        construct: String::from("tunnel operations"),
                    },
                    position.clone(),
                ));
            }

            let (call, ty) = type_check_tunnel_call(type_checker, scope, scope.part, call)?;
            (TypedExprKind::Tunnel(call), ty)
        }
        ExprKind::RemoteTunnel { client, call } => {
            require_server(&scope, "remote tunnel access", position)?;

            if let TunnelMethod::Put(_) = call.method {
                return Err(Error::semantic(
                    Violation::IllegalTunnelDirection {
                        tunnel: call.tunnel.name.clone(),
                    },
                    position.clone(),
                ));
            }

            let index = type_checker.bound_client(&scope, client)?;
            let (call, ty) = type_check_tunnel_call(type_checker, scope, PartId::Client(index), call)?;
            (
                TypedExprKind::RemoteTunnel {
                    target: client.name.clone(),
                    client: type_checker.part(PartId::Client(index))?.name.clone(),
                    call,
                },
                ty,
            )
        }
        ExprKind::Open { expr: inner, ids } => {
            require_server(&scope, "open", position)?;

            let inner = type_checker.with_opened(scope, ids, |type_checker| {
                type_check_expr(type_checker, scope, inner)
            })?;
            let ty = inner.ty.clone();

            (
                TypedExprKind::Open {
                    expr: Box::new(inner),
                    ids: ids.iter().map(|id| id.name.clone()).collect(),
                },
                ty,
            )
        }
        ExprKind::ReadInt => (TypedExprKind::ReadInt, SmclType::Sint),
    };

    Ok(TypedExpr {
        kind,
        ty,
        span: expr.span.clone(),
    })
}

fn type_check_assignment<'a>(
    type_checker: &mut TypeChecker<'a>,
    scope: Scope<'a>,
    assignment: &'a Assignment,
) -> Result<TypedExpr, Error> {
    let target = &assignment.target;

    let Some(expected) = type_checker.function(&scope)?.symbol_table.get(&target.name).cloned() else {
        return Err(Error::semantic(
            Violation::UndefinedVariable { variable: target.name.clone() },
            target.span.start.clone(),
        ));
    };

    let value = type_check_expr(type_checker, scope, &assignment.value)?;

    if value.ty != expected {
        return Err(Error::semantic(
            Violation::AssignmentMismatch {
                variable: target.name.clone(),
                expected,
                received: value.ty.clone(),
            },
            assignment.value.span.start.clone(),
        ));
    }

    Ok(value)
}

fn type_check_condition<'a>(
    type_checker: &mut TypeChecker<'a>,
    scope: Scope<'a>,
    condition: &'a Expr,
    construct: &str,
) -> Result<TypedExpr, Error> {
    let condition = type_check_expr(type_checker, scope, condition)?;

    if !condition.ty.compatible(&SmclType::Bool) {
        return Err(Error::semantic(
            Violation::ConditionType {
                construct: construct.to_string(),
                received: condition.ty.clone(),
            },
            condition.span.start.clone(),
        ));
    }

    Ok(condition)
}

pub fn type_check_stmt<'a>(
    type_checker: &mut TypeChecker<'a>,
    scope: Scope<'a>,
    stmt: &'a Stmt,
) -> Result<TypedStmt, Error> {
    let position = &stmt.span.start;

    let kind = match &stmt.kind {
        StmtKind::Declaration { typed, assignment } => {
            type_checker.declare(&scope, typed)?;

            let value = match assignment {
                Some(assignment) => Some(type_check_assignment(type_checker, scope, assignment)?),
                None => None,
            };

            TypedStmtKind::Declaration {
                name: typed.name.name.clone(),
                ty: typed.ty.clone(),
                value,
            }
        }
        StmtKind::Assignment(assignment) => TypedStmtKind::Assignment {
            target: assignment.target.name.clone(),
            value: type_check_assignment(type_checker, scope, assignment)?,
        },
        StmtKind::Expression(expr) => {
            TypedStmtKind::Expression(type_check_expr(type_checker, scope, expr)?)
        }
        StmtKind::Display(expr) => {
            let value = type_check_expr(type_checker, scope, expr)?;

            if type_checker.options.strict_display && value.ty != SmclType::String {
                return Err(Error::semantic(
                    Violation::DisplayType { received: value.ty.clone() },
                    value.span.start.clone(),
                ));
            }

            TypedStmtKind::Display(value)
        }
        StmtKind::If { condition, then_body, else_body } => {
            let condition = type_check_condition(type_checker, scope, condition, "if")?;
            let then_body = type_check_stmt(type_checker, scope, then_body)?;
            let else_body = match else_body {
                Some(else_body) => Some(Box::new(type_check_stmt(type_checker, scope, else_body)?)),
                None => None,
            };

            TypedStmtKind::If {
                condition,
                then_body: Box::new(then_body),
                else_body,
            }
        }
        StmtKind::While { condition, body } => {
            let condition = type_check_condition(type_checker, scope, condition, "while")?;
            let body = type_check_stmt(type_checker, scope, body)?;

            TypedStmtKind::While {
                condition,
                body: Box::new(body),
            }
        }
        StmtKind::For { variable, group, body } => {
            require_server(&scope, "for loops", position)?;

            if variable.ty != SmclType::Client {
                return Err(Error::semantic(
                    Violation::LoopVariableType { received: variable.ty.clone() },
                    variable.span.start.clone(),
                ));
            }

            let Some(client) = type_checker.part(scope.part)?.group(&group.name) else {
                return Err(Error::semantic(
                    Violation::UndefinedGroup { group: group.name.clone() },
                    group.span.start.clone(),
                ));
            };

            let body = type_checker.with_loop_binding(scope, variable, client, |type_checker| {
                type_check_stmt(type_checker, scope, body)
            })?;

            TypedStmtKind::For {
                variable: variable.name.name.clone(),
                group: group.name.clone(),
                client: type_checker.part(PartId::Client(client))?.name.clone(),
                body: Box::new(body),
            }
        }
        StmtKind::Return(value) => {
            let expected = type_checker.function(&scope)?.function.return_type.clone();

            let value = match value {
                Some(value) => Some(type_check_expr(type_checker, scope, value)?),
                None => None,
            };
            let ty = value
                .as_ref()
                .map(|value| value.ty.clone())
                .unwrap_or(SmclType::Void);

            if ty != expected {
                return Err(Error::semantic(
                    Violation::ReturnMismatch {
                        function: scope.function.to_string(),
                        expected,
                        received: ty,
                    },
                    position.clone(),
                ));
            }

            TypedStmtKind::Return { value, ty }
        }
        StmtKind::Block(body) => TypedStmtKind::Block(
            body.iter()
                .map(|stmt| type_check_stmt(type_checker, scope, stmt))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    Ok(TypedStmt {
        kind,
        span: stmt.span.clone(),
    })
}

fn type_check_function<'a>(
    type_checker: &mut TypeChecker<'a>,
    part: PartId,
    function: &'a Function,
) -> Result<TypedFunction, Error> {
    let name = &function.name.name;

    let part_environment = type_checker
        .environment
        .part_mut(part)
        .ok_or_else(|| unregistered_part(part))?;
    debug!(function = %name, part = %part_environment.name, "checking function");

    if part_environment.functions.contains_key(name) {
        return Err(Error::semantic(
            Violation::DuplicateFunction {
                function: name.clone(),
                part: part_environment.name.clone(),
            },
            function.name.span.start.clone(),
        ));
    }
    if matches!(part, PartId::Client(_)) && TunnelMethod::is_method_name(name) {
        return Err(Error::semantic(
            Violation::ReservedFunctionName {
                function: name.clone(),
                part: part_environment.name.clone(),
            },
            function.name.span.start.clone(),
        ));
    }
    part_environment
        .functions
        .insert(name.clone(), FunctionEnvironment::new(function));

    let scope = Scope::new(part, name);
    for parameter in &function.parameters {
        type_checker.declare(&scope, parameter)?;
    }

    let body = function
        .body
        .iter()
        .map(|stmt| type_check_stmt(type_checker, scope, stmt))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypedFunction {
        name: name.clone(),
        return_type: function.return_type.clone(),
        parameters: function
            .parameters
            .iter()
            .map(|parameter| TypedParameter {
                name: parameter.name.name.clone(),
                ty: parameter.ty.clone(),
            })
            .collect(),
        body,
        span: function.span.clone(),
    })
}

fn declare_tunnel(part: &mut PartEnvironment, tunnel: &Tunnel) -> Result<TypedTunnel, Error> {
    let name = &tunnel.typed.name.name;
    let position = tunnel.typed.name.span.start.clone();

    let PartKind::Client { tunnels } = &mut part.kind else {
        return Err(Error::semantic(
            Violation::OutsideClient {
                construct: String::from("tunnels"),
            },
            position,
        ));
    };

    if tunnels.contains_key(name) {
        return Err(Error::semantic(
            Violation::DuplicateTunnel {
                tunnel: name.clone(),
                part: part.name.clone(),
            },
            position,
        ));
    }

    if !tunnel.typed.ty.is_tunnelable() {
        return Err(Error::semantic(
            Violation::UnsupportedTunnelType {
                tunnel: name.clone(),
                received: tunnel.typed.ty.clone(),
            },
            tunnel.typed.span.start.clone(),
        ));
    }

    tunnels.insert(name.clone(), tunnel.typed.ty.clone());

    Ok(TypedTunnel {
        name: name.clone(),
        ty: tunnel.typed.ty.clone(),
        span: tunnel.span.clone(),
    })
}

fn declare_group(
    environment: &GlobalEnvironment,
    part: &mut PartEnvironment,
    group: &Group,
) -> Result<TypedGroup, Error> {
    let alias = &group.alias.name;

    let Some(client) = environment.find_client(&group.client.name) else {
        return Err(Error::semantic(
            Violation::UndefinedPart {
                part: group.client.name.clone(),
            },
            group.client.span.start.clone(),
        ));
    };

    let PartKind::Server { groups } = &mut part.kind else {
        return Err(Error::semantic(
            Violation::OutsideServer {
                construct: String::from("groups"),
            },
            group.span.start.clone(),
        ));
    };

    if groups.contains_key(alias) {
        return Err(Error::semantic(
            Violation::DuplicateGroup {
                group: alias.clone(),
                part: part.name.clone(),
            },
            group.alias.span.start.clone(),
        ));
    }

    groups.insert(alias.clone(), client);

    Ok(TypedGroup {
        client: group.client.name.clone(),
        alias: alias.clone(),
        span: group.span.clone(),
    })
}

fn type_check_client<'a>(type_checker: &mut TypeChecker<'a>, client: &'a Client) -> Result<TypedClient, Error> {
    let name = &client.name.name;
    debug!(client = %name, "checking client");

    if type_checker.environment.find_client(name).is_some() {
        return Err(Error::semantic(
            Violation::DuplicatePart { part: name.clone() },
            client.name.span.start.clone(),
        ));
    }

    let mut environment = PartEnvironment::client(name);
    let tunnels = client
        .tunnels
        .iter()
        .map(|tunnel| declare_tunnel(&mut environment, tunnel))
        .collect::<Result<Vec<_>, _>>()?;

    type_checker.environment.clients.push(environment);
    let part = PartId::Client(type_checker.environment.clients.len() - 1);

    let functions = client
        .functions
        .iter()
        .map(|function| type_check_function(type_checker, part, function))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypedClient {
        name: name.clone(),
        tunnels,
        functions,
        span: client.span.clone(),
    })
}

fn type_check_server<'a>(type_checker: &mut TypeChecker<'a>, server: &'a Server) -> Result<TypedServer, Error> {
    let name = &server.name.name;
    debug!(server = %name, "checking server");

    let mut environment = PartEnvironment::server(name);
    let groups = server
        .groups
        .iter()
        .map(|group| declare_group(&type_checker.environment, &mut environment, group))
        .collect::<Result<Vec<_>, _>>()?;

    type_checker.environment.server = Some(environment);

    let functions = server
        .functions
        .iter()
        .map(|function| type_check_function(type_checker, PartId::Server, function))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypedServer {
        name: name.clone(),
        groups,
        functions,
        span: server.span.clone(),
    })
}

/// Analyzes `program`, producing its typed tree or the first violation found.
///
/// Clients are registered in order before the server, so groups may name
/// any client and the server may invoke any client function.
pub fn type_check(program: &Program, options: AnalyzerOptions) -> Result<TypedProgram, Error> {
    let mut type_checker = TypeChecker::new(options);

    let clients = program
        .clients
        .iter()
        .map(|client| type_check_client(&mut type_checker, client))
        .collect::<Result<Vec<_>, _>>()?;
    let server = type_check_server(&mut type_checker, &program.server)?;

    debug!(clients = clients.len(), "analysis finished");

    Ok(TypedProgram {
        clients,
        server,
        span: program.span.clone(),
    })
}
