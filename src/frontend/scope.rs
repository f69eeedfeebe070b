use std::collections::HashMap;

use crate::ast::ParameterList;

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The name as declared.
    pub identifier: String,
    /// Variable type or routine return type; empty while unresolved or for a
    /// `SUB`.
    pub datatype:   String,
    /// Parameters of a callable symbol; `None` for variables.
    pub parameters: Option<ParameterList>,
}

impl Symbol {
    /// A variable, possibly with an unresolved (empty) type.
    #[must_use]
    pub fn variable(identifier: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self { identifier: identifier.into(),
               datatype:   datatype.into(),
               parameters: None, }
    }

    /// A `SUB` (empty return type) or `FUNCTION`.
    #[must_use]
    pub fn callable(identifier: impl Into<String>,
                    return_type: impl Into<String>,
                    parameters: ParameterList)
                    -> Self {
        Self { identifier: identifier.into(),
               datatype:   return_type.into(),
               parameters: Some(parameters), }
    }

    #[must_use]
    pub const fn is_callable(&self) -> bool {
        self.parameters.is_some()
    }

    /// Returns `true` once the symbol has a datatype.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !self.datatype.is_empty()
    }
}

/// Result of [`ScopeStack::insert`].
#[derive(Debug)]
pub enum Insertion<'a> {
    /// The symbol was added to the innermost frame.
    Added(&'a Symbol),
    /// The innermost frame already declares the identifier; this is the
    /// existing symbol, left untouched.
    Exists(&'a Symbol),
}

/// One lexical block's namespace.
#[derive(Debug)]
pub struct Frame {
    label:   String,
    symbols: HashMap<String, Symbol>,
}

impl Frame {
    fn new(label: &str) -> Self {
        Self { label:   label.to_string(),
               symbols: HashMap::new(), }
    }

    /// The label given when the frame was entered.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of symbols declared directly in this frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Stack of symbol frames with shadowing lookup.
///
/// The file-level frame created by [`ScopeStack::new`] is never popped.
///
/// ```
/// use transbasic::frontend::scope::{Insertion, ScopeStack, Symbol};
///
/// let mut scopes = ScopeStack::new("file");
/// assert!(matches!(scopes.insert(Symbol::variable("x", "integer")), Insertion::Added(_)));
///
/// scopes.enter("loop");
/// scopes.insert(Symbol::variable("x", "string"));
/// assert_eq!(scopes.lookup("x").unwrap().datatype, "string");
///
/// scopes.exit();
/// assert_eq!(scopes.lookup("x").unwrap().datatype, "integer");
/// ```
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// Creates the stack with its file-level frame.
    #[must_use]
    pub fn new(root_label: &str) -> Self {
        Self { frames: vec![Frame::new(root_label)] }
    }

    /// Pushes an empty frame.
    pub fn enter(&mut self, label: &str) {
        self.frames.push(Frame::new(label));
        tracing::debug!(label, depth = self.frames.len(), "entered scope");
    }

    /// Pops the innermost frame, ending the lifetime of its symbols.
    ///
    /// Returns `None`, leaving the stack unchanged, when only the file-level
    /// frame remains.
    pub fn exit(&mut self) -> Option<Frame> {
        if self.frames.len() == 1 {
            return None;
        }
        let frame = self.frames.pop()?;
        tracing::debug!(label = %frame.label, symbols = frame.len(), "left scope");
        Some(frame)
    }

    /// Declares `symbol` in the innermost frame unless that frame already
    /// has the identifier.
    pub fn insert(&mut self, symbol: Symbol) -> Insertion<'_> {
        let depth = self.frames.len();
        let frame = self.innermost_mut();
        if frame.symbols.contains_key(&symbol.identifier) {
            return Insertion::Exists(&frame.symbols[&symbol.identifier]);
        }
        tracing::debug!(identifier = %symbol.identifier,
                        datatype = %symbol.datatype,
                        callable = symbol.is_callable(),
                        depth,
                        "declared");
        let key = symbol.identifier.clone();
        Insertion::Added(frame.symbols.entry(key).or_insert(symbol))
    }

    /// Finds the innermost declaration of `identifier`.
    #[must_use]
    pub fn lookup(&self, identifier: &str) -> Option<&Symbol> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.symbols.get(identifier))
    }

    /// Mutable access to the innermost declaration of `identifier`.
    pub fn lookup_mut(&mut self, identifier: &str) -> Option<&mut Symbol> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.symbols.get_mut(identifier))
    }

    /// Number of active frames, including the file-level one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Label of the innermost frame.
    #[must_use]
    pub fn current_label(&self) -> &str {
        self.frames.last().map_or("", Frame::label)
    }

    fn innermost_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}
