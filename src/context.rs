//! Scope tracking for the document writer.
//!
//! Legality of every writer call is decided by one function, [`transition`],
//! which maps the kind of the innermost scope and the requested [`Operation`]
//! to a [`Transition`] or an error. The writer's scope stack consults it before it
//! touches any state, so a rejected call leaves the stack exactly as it was.
//!
//! | Operation        | TopLevelMap       | Map               | Array             | Sealed |
//! |------------------|-------------------|-------------------|-------------------|--------|
//! | `Put`            | stay              | stay              | illegal           | illegal |
//! | `Add`            | illegal           | illegal           | stay              | illegal |
//! | `OpenNamed`      | push              | push              | illegal           | illegal |
//! | `OpenPositional` | illegal           | illegal           | push              | illegal |
//! | `EndMap`         | illegal           | pop               | illegal           | illegal |
//! | `EndArray`       | illegal           | illegal           | pop               | illegal |
//! | `Seal`           | seal              | unterminated      | unterminated      | no-op  |
//!
//! Opening a container is also refused once [`MAX_NESTING`] scopes are open, so
//! every document the writer can build stays readable by [`crate::Reader`].

use crate::{DocMap, Error, Result, Value};
use std::fmt;

/// Deepest container level allowed below the top-level map.
pub const MAX_NESTING: usize = 256;

/// Kind of a scope on the writer's stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The implicit root map every writer starts in.
    TopLevelMap,
    /// A named or positional nested map.
    Map,
    /// A named or positional nested array.
    Array,
    /// The writer has been built; nothing can be written any more.
    Sealed,
}

impl ScopeKind {
    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, ScopeKind::TopLevelMap | ScopeKind::Map)
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, ScopeKind::Array)
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScopeKind::TopLevelMap => "top-level map",
            ScopeKind::Map => "map scope",
            ScopeKind::Array => "array scope",
            ScopeKind::Sealed => "sealed document",
        })
    }
}

/// Kind of container a push opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Map,
    Array,
}

/// A writer operation, as seen by the scope state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Store a value under a field name.
    Put,
    /// Append a value to an array.
    Add,
    /// Open a container under a field name.
    OpenNamed(ContainerKind),
    /// Open a container as the next array element.
    OpenPositional(ContainerKind),
    EndMap,
    EndArray,
    /// Freeze the document.
    Seal,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Put => "put",
            Operation::Add => "add",
            Operation::OpenNamed(ContainerKind::Map) => "put_new_map",
            Operation::OpenNamed(ContainerKind::Array) => "put_new_array",
            Operation::OpenPositional(ContainerKind::Map) => "start_map",
            Operation::OpenPositional(ContainerKind::Array) => "start_array",
            Operation::EndMap => "end_map",
            Operation::EndArray => "end_array",
            Operation::Seal => "build",
        })
    }
}

/// The effect a legal operation has on the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Write into the current scope.
    Stay,
    /// Open a child scope of the given kind.
    Push(ScopeKind),
    /// Close the current scope into its parent.
    Pop,
    /// Freeze the root map.
    Seal,
    /// Nothing to do.
    Noop,
}

/// Decides whether `operation` is legal in a scope of kind `scope`.
///
/// `depth` is the number of open nested scopes. [`Operation::Seal`] requires
/// it to be zero, and opening a container requires it below [`MAX_NESTING`].
///
/// # Errors
///
/// Returns [`Error::IllegalContext`] for operations the scope does not allow,
/// [`Error::UnterminatedScope`] for sealing with nested scopes open and
/// [`Error::NestingTooDeep`] for opening a container past the limit.
///
/// # Examples
///
/// ```rust
/// use typed_doc::{transition, Operation, ScopeKind, Transition};
///
/// assert_eq!(transition(ScopeKind::Array, Operation::Add, 1), Ok(Transition::Stay));
/// assert!(transition(ScopeKind::Array, Operation::Put, 1).is_err());
/// assert_eq!(transition(ScopeKind::Sealed, Operation::Seal, 0), Ok(Transition::Noop));
/// ```
pub fn transition(scope: ScopeKind, operation: Operation, depth: usize) -> Result<Transition> {
    let illegal = || -> Result<Transition> { Err(Error::illegal_context(operation, scope)) };

    match (scope, operation) {
        (ScopeKind::Sealed, Operation::Seal) => Ok(Transition::Noop),
        (ScopeKind::Sealed, _) => illegal(),

        (ScopeKind::TopLevelMap, Operation::Seal) => Ok(Transition::Seal),
        (_, Operation::Seal) => Err(Error::UnterminatedScope { open: depth }),

        (s, Operation::Put) if s.is_map() => Ok(Transition::Stay),
        (s, Operation::Add) if s.is_array() => Ok(Transition::Stay),

        (s, Operation::OpenNamed(kind)) if s.is_map() => push(kind, depth),
        (s, Operation::OpenPositional(kind)) if s.is_array() => push(kind, depth),

        (ScopeKind::Map, Operation::EndMap) => Ok(Transition::Pop),
        (ScopeKind::Array, Operation::EndArray) => Ok(Transition::Pop),

        _ => illegal(),
    }
}

fn push(kind: ContainerKind, depth: usize) -> Result<Transition> {
    if depth >= MAX_NESTING {
        return Err(Error::NestingTooDeep { limit: MAX_NESTING });
    }
    Ok(Transition::Push(scope_of(kind)))
}

/// Container levels inside `value`; scalars have none.
fn nesting(value: &Value) -> usize {
    match value {
        Value::Array(arr) => 1 + arr.iter().map(nesting).max().unwrap_or(0),
        Value::Map(map) => 1 + map.values().map(nesting).max().unwrap_or(0),
        _ => 0,
    }
}

const fn scope_of(kind: ContainerKind) -> ScopeKind {
    match kind {
        ContainerKind::Map => ScopeKind::Map,
        ContainerKind::Array => ScopeKind::Array,
    }
}

/// Where a closed scope's container goes in its parent.
#[derive(Debug)]
enum Slot {
    Root,
    Field(String),
    Element,
}

#[derive(Debug)]
enum Container {
    Map(DocMap),
    Array(Vec<Value>),
}

impl Container {
    fn into_value(self) -> Value {
        match self {
            Container::Map(map) => Value::Map(map),
            Container::Array(arr) => Value::Array(arr),
        }
    }
}

#[derive(Debug)]
struct Frame {
    kind: ScopeKind,
    slot: Slot,
    container: Container,
}

/// The stack of open scopes, rooted at the top-level map.
///
/// Once sealed the stack is empty and holds the finished root instead.
#[derive(Debug)]
pub(crate) struct ContextStack {
    frames: Vec<Frame>,
    sealed: Option<Value>,
}

impl ContextStack {
    pub(crate) fn new() -> Self {
        ContextStack {
            frames: vec![Frame {
                kind: ScopeKind::TopLevelMap,
                slot: Slot::Root,
                container: Container::Map(DocMap::new()),
            }],
            sealed: None,
        }
    }

    /// Kind of the innermost open scope.
    pub(crate) fn current(&self) -> ScopeKind {
        self.frames
            .last()
            .map_or(ScopeKind::Sealed, |frame| frame.kind)
    }

    /// Number of open scopes above the top-level map.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    fn check(&self, operation: Operation) -> Result<Transition> {
        transition(self.current(), operation, self.depth())
    }

    fn top_container(&mut self) -> Option<&mut Container> {
        self.frames.last_mut().map(|frame| &mut frame.container)
    }

    /// Rejects a complete container that would nest past [`MAX_NESTING`] here.
    fn check_nesting(&self, value: &Value) -> Result<()> {
        if self.depth() + nesting(value) > MAX_NESTING {
            return Err(Error::NestingTooDeep { limit: MAX_NESTING });
        }
        Ok(())
    }

    pub(crate) fn put(&mut self, name: String, value: Value) -> Result<()> {
        self.check(Operation::Put)?;
        self.check_nesting(&value)?;
        if let Some(Container::Map(map)) = self.top_container() {
            map.insert(name, value);
        }
        Ok(())
    }

    pub(crate) fn add(&mut self, value: Value) -> Result<()> {
        self.check(Operation::Add)?;
        self.check_nesting(&value)?;
        if let Some(Container::Array(arr)) = self.top_container() {
            arr.push(value);
        }
        Ok(())
    }

    /// Opens a container under `name`, reserving the field's position now.
    pub(crate) fn open_named(&mut self, name: String, kind: ContainerKind) -> Result<()> {
        let Transition::Push(scope) = self.check(Operation::OpenNamed(kind))? else {
            return Ok(());
        };
        if let Some(Container::Map(map)) = self.top_container() {
            map.insert(name.clone(), Value::Null);
        }
        tracing::trace!(field = %name, %scope, depth = self.depth() + 1, "open scope");
        self.push(scope, Slot::Field(name));
        Ok(())
    }

    pub(crate) fn open_positional(&mut self, kind: ContainerKind) -> Result<()> {
        let Transition::Push(scope) = self.check(Operation::OpenPositional(kind))? else {
            return Ok(());
        };
        tracing::trace!(%scope, depth = self.depth() + 1, "open scope");
        self.push(scope, Slot::Element);
        Ok(())
    }

    fn push(&mut self, kind: ScopeKind, slot: Slot) {
        let container = match kind {
            ScopeKind::Array => Container::Array(Vec::new()),
            _ => Container::Map(DocMap::new()),
        };
        self.frames.push(Frame {
            kind,
            slot,
            container,
        });
    }

    /// Closes the innermost scope and moves its container into the parent.
    pub(crate) fn close(&mut self, operation: Operation) -> Result<()> {
        if self.check(operation)? != Transition::Pop {
            return Ok(());
        }
        let Some(frame) = self.frames.pop() else {
            return Ok(());
        };
        tracing::trace!(scope = %frame.kind, depth = self.depth(), "close scope");

        let value = frame.container.into_value();
        match (frame.slot, self.top_container()) {
            (Slot::Field(name), Some(Container::Map(map))) => {
                map.insert(name, value);
            }
            (Slot::Element, Some(Container::Array(arr))) => arr.push(value),
            _ => {}
        }
        Ok(())
    }

    /// Freezes the root map once every nested scope is closed.
    ///
    /// Sealing an already sealed stack does nothing.
    pub(crate) fn seal(&mut self) -> Result<()> {
        if self.check(Operation::Seal)? != Transition::Seal {
            return Ok(());
        }
        if let Some(frame) = self.frames.pop() {
            self.sealed = Some(frame.container.into_value());
        }
        Ok(())
    }

    pub(crate) fn sealed(&self) -> Option<&Value> {
        self.sealed.as_ref()
    }

    pub(crate) fn into_sealed(self) -> Option<Value> {
        self.sealed
    }
}
