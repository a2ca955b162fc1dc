use crate::{
    ast::expressions::BinaryOperator,
    type_checker::typed_ast::{
        TypedCall, TypedClient, TypedExpr, TypedExprKind, TypedFunction, TypedProgram, TypedServer,
        TypedStmt, TypedStmtKind, TypedTunnelCall, TypedTunnelMethod,
    },
};

const INDENT: &str = "    ";

/// Precedence of `not`, above every binary operator.
const NOT_PRECEDENCE: u8 = 7;
/// Precedence of literals, names and calls.
const ATOM_PRECEDENCE: u8 = 8;

pub struct Printer {
    output: String,
    level: usize,
}

impl Printer {
    pub fn new() -> Self {
        Printer {
            output: String::new(),
            level: 0,
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn blank_line(&mut self) {
        self.output.push('\n');
    }

    fn indented(&mut self, print: impl FnOnce(&mut Self)) {
        self.level += 1;
        print(self);
        self.level -= 1;
    }

    pub fn print_program(&mut self, program: &TypedProgram) {
        for client in &program.clients {
            self.print_client(client);
            self.blank_line();
        }
        self.print_server(&program.server);
    }

    fn print_client(&mut self, client: &TypedClient) {
        self.line(&format!("declare client {} {{", client.name));
        self.indented(|printer| {
            for tunnel in &client.tunnels {
                printer.line(&format!("tunnel of {} {};", tunnel.ty, tunnel.name));
            }
            printer.print_functions(!client.tunnels.is_empty(), &client.functions);
        });
        self.line("}");
    }

    fn print_server(&mut self, server: &TypedServer) {
        self.line(&format!("declare server {} {{", server.name));
        self.indented(|printer| {
            for group in &server.groups {
                printer.line(&format!("group of {} {};", group.client, group.alias));
            }
            printer.print_functions(!server.groups.is_empty(), &server.functions);
        });
        self.line("}");
    }

    fn print_functions(&mut self, separate_first: bool, functions: &[TypedFunction]) {
        for (index, function) in functions.iter().enumerate() {
            if separate_first || index > 0 {
                self.blank_line();
            }
            self.print_function(function);
        }
    }

    fn print_function(&mut self, function: &TypedFunction) {
        let parameters = function
            .parameters
            .iter()
            .map(|parameter| format!("{} {}", parameter.ty, parameter.name))
            .collect::<Vec<_>>()
            .join(", ");

        self.line(&format!(
            "function {} {}({}) {{",
            function.return_type, function.name, parameters
        ));
        self.indented(|printer| {
            for stmt in &function.body {
                printer.print_stmt(stmt);
            }
        });
        self.line("}");
    }

    /// Prints `header` followed by the body of a compound statement.
    ///
    /// Blocks open on the header line; anything else goes on its own line,
    /// one level deeper.
    fn print_body(&mut self, header: &str, body: &TypedStmt) {
        match &body.kind {
            TypedStmtKind::Block(stmts) => {
                self.line(&format!("{} {{", header));
                self.indented(|printer| {
                    for stmt in stmts {
                        printer.print_stmt(stmt);
                    }
                });
                self.line("}");
            }
            _ => {
                self.line(header);
                self.indented(|printer| printer.print_stmt(body));
            }
        }
    }

    pub fn print_stmt(&mut self, stmt: &TypedStmt) {
        match &stmt.kind {
            TypedStmtKind::Declaration { name, ty, value } => match value {
                Some(value) => self.line(&format!("{} {} = {};", ty, name, print_expr(value))),
                None => self.line(&format!("{} {};", ty, name)),
            },
            TypedStmtKind::Assignment { target, value } => {
                self.line(&format!("{} = {};", target, print_expr(value)))
            }
            TypedStmtKind::Expression(expr) => self.line(&format!("{};", print_expr(expr))),
            TypedStmtKind::Display(expr) => self.line(&format!("display({});", print_expr(expr))),
            TypedStmtKind::If { condition, then_body, else_body } => {
                self.print_body(&format!("if ({})", print_expr(condition)), then_body);
                if let Some(else_body) = else_body {
                    self.print_body("else", else_body);
                }
            }
            TypedStmtKind::While { condition, body } => {
                self.print_body(&format!("while ({})", print_expr(condition)), body)
            }
            TypedStmtKind::For { variable, group, body, .. } => {
                self.print_body(&format!("for (client {} in {})", variable, group), body)
            }
            TypedStmtKind::Return { value, .. } => match value {
                Some(value) => self.line(&format!("return {};", print_expr(value))),
                None => self.line("return;"),
            },
            TypedStmtKind::Block(stmts) => {
                self.line("{");
                self.indented(|printer| {
                    for stmt in stmts {
                        printer.print_stmt(stmt);
                    }
                });
                self.line("}");
            }
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Printer::new()
    }
}

fn operator_precedence(operator: BinaryOperator) -> u8 {
    match operator {
        BinaryOperator::Or => 1,
        BinaryOperator::And => 2,
        BinaryOperator::Equal => 3,
        BinaryOperator::Less | BinaryOperator::Greater => 4,
        BinaryOperator::Add | BinaryOperator::Subtract => 5,
        BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => 6,
    }
}

fn precedence(expr: &TypedExpr) -> u8 {
    match &expr.kind {
        TypedExprKind::Binary { operator, .. } => operator_precedence(*operator),
        TypedExprKind::Not(_) => NOT_PRECEDENCE,
        _ => ATOM_PRECEDENCE,
    }
}

/// Prints `expr`, parenthesised when it binds looser than `minimum`.
fn print_operand(expr: &TypedExpr, minimum: u8) -> String {
    if precedence(expr) < minimum {
        format!("({})", print_expr(expr))
    } else {
        print_expr(expr)
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn print_arguments(arguments: &[TypedExpr]) -> String {
    arguments.iter().map(print_expr).collect::<Vec<_>>().join(", ")
}

fn print_call(call: &TypedCall) -> String {
    format!("{}({})", call.function, print_arguments(&call.arguments))
}

fn print_tunnel_call(call: &TypedTunnelCall) -> String {
    let argument = match &call.method {
        TypedTunnelMethod::Put(value) => print_expr(value),
        TypedTunnelMethod::Get | TypedTunnelMethod::Take => String::new(),
    };
    format!("{}.{}({})", call.tunnel, call.method.name(), argument)
}

pub fn print_expr(expr: &TypedExpr) -> String {
    match &expr.kind {
        TypedExprKind::Int(value) => value.to_string(),
        TypedExprKind::Bool(value) => value.to_string(),
        TypedExprKind::String(value) => format!("\"{}\"", escape(value)),
        TypedExprKind::Symbol(name) => name.clone(),
        TypedExprKind::Binary { operator, left, right } => {
            let own = operator_precedence(*operator);
            // Binary operators associate to the left.
            format!(
                "{} {} {}",
                print_operand(left, own),
                operator,
                print_operand(right, own + 1)
            )
        }
        TypedExprKind::Not(operand) => format!("not {}", print_operand(operand, NOT_PRECEDENCE)),
        TypedExprKind::Call(call) => print_call(call),
        TypedExprKind::MethodInvocation { target, call, .. } => {
            format!("{}.{}", target, print_call(call))
        }
        TypedExprKind::Tunnel(call) => print_tunnel_call(call),
        TypedExprKind::RemoteTunnel { target, call, .. } => {
            format!("{}.{}", target, print_tunnel_call(call))
        }
        TypedExprKind::Open { expr, ids } => {
            format!("open({} | {})", print_expr(expr), ids.join(", "))
        }
        TypedExprKind::ReadInt => String::from("readInt()"),
    }
}

/// Renders `program` as SMCL source.
pub fn print_program(program: &TypedProgram) -> String {
    let mut printer = Printer::new();
    printer.print_program(program);
    printer.finish()
}
