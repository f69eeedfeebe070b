/// Event-recording generator.
///
/// Stores every hook invocation as an [`Event`](events::Event) value, in the
/// order the parser made them. Used as a test oracle and for the
/// `--emit events` dump of the command line tool.
pub mod events;
/// C++17 generator.
///
/// Renders the event stream as a single translation unit: routines are
/// hoisted above `main`, file-level variables become globals, cast
/// annotations become `static_cast` and `SELECT CASE` becomes an if-chain
/// over a temporary.
pub mod cpp;

use crate::ast::{
    BranchForm, CaseExpression, ExitKind, ExprNode, LoopCondition, LoopKind, Parameter,
};

/// Receiver of the emission events produced while a program is parsed.
///
/// The parser calls exactly one hook per recognised construct, strictly in
/// source order, and never replays an event. Everything it passes is already
/// checked: identifiers resolve, every expression node carries a non-empty
/// type, and call arguments match their parameters.
///
/// Block-shaped constructs follow one pattern. The header hook (`if_begin`,
/// `for_loop`, `while_loop`, `do_loop`, `function`, `case`, `case_else`) is
/// followed by [`begin_code_block`](Generator::begin_code_block), the body's
/// events and [`end_code_block`](Generator::end_code_block). An `IF` keeps a
/// single block open across its branches and reports each branch boundary
/// with [`else_if`](Generator::else_if) or
/// [`else_branch`](Generator::else_branch) while that block is open.
///
/// Simple statements end with [`end_of_statement`](Generator::end_of_statement):
/// every declaration item, assignment, call, print, return, exit and continue.
///
/// How and when text is buffered or written is entirely up to the
/// implementation.
pub trait Generator {
    /// Called once before the first statement.
    fn module_header(&mut self) {}

    /// Called once after the last statement of a successful parse.
    fn module_footer(&mut self) {}

    /// One `DIM` item. `variable.datatype` is empty when neither the item nor
    /// an initializer gives the variable a type yet; the first assignment
    /// will fix it.
    fn declaration(&mut self, variable: &Parameter, initializer: Option<&ExprNode>);

    /// Start of `target = ...`; the value follows as an
    /// [`expression`](Generator::expression) event.
    fn assignment(&mut self, target: &str);

    /// A complete expression tree in statement position.
    fn expression(&mut self, node: &ExprNode);

    fn end_of_statement(&mut self);

    fn begin_code_block(&mut self);

    fn end_code_block(&mut self);

    /// `IF condition THEN`. A single-line `IF` opens no scope, so names
    /// declared in its branches belong to the enclosing block.
    fn if_begin(&mut self, condition: &ExprNode, form: BranchForm);

    fn else_if(&mut self, condition: &ExprNode);

    fn else_branch(&mut self);

    /// `SELECT CASE subject`.
    fn select(&mut self, subject: &ExprNode);

    /// One `CASE` clause; the items are alternatives.
    fn case(&mut self, items: &[CaseExpression]);

    fn case_else(&mut self);

    fn end_select(&mut self);

    /// `FOR counter = start TO end [STEP step]`. `declares_counter` is
    /// `true` when the loop introduced the counter itself.
    fn for_loop(&mut self,
                counter: &Parameter,
                declares_counter: bool,
                start: &ExprNode,
                end: &ExprNode,
                step: Option<&ExprNode>);

    fn while_loop(&mut self, condition: &ExprNode);

    /// `DO` with its optional leading condition.
    fn do_loop(&mut self, condition: Option<&LoopCondition>);

    /// `LOOP` with its optional trailing condition. Comes after the body's
    /// [`end_code_block`](Generator::end_code_block).
    fn loop_end(&mut self, condition: Option<&LoopCondition>);

    /// Start of a `SUB` or `FUNCTION`. The signature's datatype is the
    /// return type, empty for a `SUB`.
    fn function(&mut self, signature: &Parameter, parameters: &[Parameter]);

    /// Comes after the body's [`end_code_block`](Generator::end_code_block).
    fn end_function(&mut self);

    /// A call in statement position.
    fn call(&mut self, name: &str, arguments: &[ExprNode]);

    fn return_value(&mut self, value: Option<&ExprNode>);

    fn print(&mut self, items: &[ExprNode]);

    fn exit(&mut self, kind: ExitKind);

    fn continue_loop(&mut self, kind: LoopKind);
}
