//! Cell data structures.
//!
//! - [`Content`] - what a cell holds (blank, literal text or a formula)
//! - [`Cell`] - content plus a lazily filled value cache and the
//!   address-keyed parent/child edges of the dependency graph
//! - [`CellView`] - a borrowed, read-only handle that can evaluate

use std::cell::OnceCell;
use std::collections::BTreeSet;

use sheetgraph_formula::{Address, CellLookup, Formula, Limits, ParseError, Value};

use super::Sheet;

/// Leading character that makes input a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character that forces input to be stored as literal text.
pub const ESCAPE_SIGN: char = '\'';

/// The content of a cell.
#[derive(Clone, Debug, Default)]
pub enum Content {
    #[default]
    Blank,
    /// Raw text as entered, escape marker included.
    Literal(String),
    Formula(Formula),
}

impl Content {
    /// Classify user input.
    /// - Empty -> Blank
    /// - `=` followed by anything -> Formula (parsed here)
    /// - Otherwise -> Literal, including a lone `=`
    pub fn from_input(text: &str, limits: &Limits) -> Result<Content, ParseError> {
        if text.is_empty() {
            return Ok(Content::Blank);
        }
        match text.strip_prefix(FORMULA_SIGN) {
            Some(expr) if !expr.is_empty() => Ok(Content::Formula(Formula::parse(expr, limits)?)),
            _ => Ok(Content::Literal(text.to_string())),
        }
    }

    /// Text form for editing: what was entered, with formulas rendered
    /// canonically.
    pub fn text(&self) -> String {
        match self {
            Content::Blank => String::new(),
            Content::Literal(text) => text.clone(),
            Content::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    pub fn references(&self) -> &[Address] {
        match self {
            Content::Formula(formula) => formula.referenced_cells(),
            _ => &[],
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Content::Blank)
    }

    fn evaluate(&self, lookup: &dyn CellLookup) -> Value {
        match self {
            Content::Blank => Value::empty(),
            Content::Literal(text) => {
                Value::Text(text.strip_prefix(ESCAPE_SIGN).unwrap_or(text).to_string())
            }
            Content::Formula(formula) => formula.evaluate(lookup),
        }
    }
}

/// A cell in the sheet.
#[derive(Debug)]
pub struct Cell {
    address: Address,
    content: Content,
    cache: OnceCell<Value>,
    /// Cells this cell's formula reads.
    pub(crate) parents: BTreeSet<Address>,
    /// Cells whose formulas read this cell.
    pub(crate) children: BTreeSet<Address>,
}

impl Cell {
    pub fn new_blank(address: Address) -> Cell {
        Cell {
            address,
            content: Content::Blank,
            cache: OnceCell::new(),
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn parents(&self) -> impl Iterator<Item = Address> + '_ {
        self.parents.iter().copied()
    }

    pub fn children(&self) -> impl Iterator<Item = Address> + '_ {
        self.children.iter().copied()
    }

    pub fn is_referenced(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn cached_value(&self) -> Option<&Value> {
        self.cache.get()
    }

    /// Replace the content. Edges are rewired by the sheet.
    pub(crate) fn set_content(&mut self, content: Content) {
        self.content = content;
        self.cache.take();
    }

    /// Drop the cached value. Returns whether there was one.
    pub(crate) fn invalidate(&mut self) -> bool {
        self.cache.take().is_some()
    }

    /// Cached value, computing and storing it on first use.
    pub(crate) fn compute(&self, lookup: &dyn CellLookup) -> Value {
        self.cache.get_or_init(|| self.content.evaluate(lookup)).clone()
    }
}

/// Read-only view of a stored cell.
#[derive(Clone, Copy)]
pub struct CellView<'a> {
    pub(crate) sheet: &'a Sheet,
    pub(crate) cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub fn address(&self) -> Address {
        self.cell.address
    }

    pub fn content(&self) -> &'a Content {
        &self.cell.content
    }

    pub fn value(&self) -> Value {
        self.sheet.evaluate(self.cell.address)
    }

    pub fn text(&self) -> String {
        self.cell.text()
    }

    /// Cells the formula reads, row-major.
    pub fn referenced_cells(&self) -> Vec<Address> {
        self.cell.content.references().to_vec()
    }

    pub fn is_referenced(&self) -> bool {
        self.cell.is_referenced()
    }

    /// Cells whose formulas read this one.
    pub fn dependents(&self) -> Vec<Address> {
        self.cell.children().collect()
    }
}

impl std::fmt::Debug for CellView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellView")
            .field("address", &self.cell.address)
            .field("content", &self.cell.content)
            .finish()
    }
}
