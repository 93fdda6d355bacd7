//! Symbol allocation and lexical scope during normalization.
//!
//! All locals of a template share one program level table: a block param
//! gets a fresh slot even when its name repeats, which is what lets an inner
//! `item` shadow an outer one. Frames only record which slots are visible.

use crate::assertions::existing;

use super::nodes::ProgramSymbols;

#[derive(Debug)]
struct Frame {
    /// `(name, symbol)` pairs declared by the frame.
    locals: Vec<(String, u32)>,
}

#[derive(Debug)]
pub struct SymbolTable {
    symbols: Vec<String>,
    upvars: Vec<String>,
    has_eval: bool,
    embedder_locals: Vec<String>,
    used_locals: Vec<String>,
    frames: Vec<Frame>,
}

impl SymbolTable {
    pub fn new(embedder_locals: Vec<String>) -> Self {
        SymbolTable {
            symbols: Vec::new(),
            upvars: Vec::new(),
            has_eval: false,
            embedder_locals,
            used_locals: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn allocate(&mut self, name: &str) -> u32 {
        self.symbols.push(name.to_string());
        self.symbols.len() as u32
    }

    fn allocate_unique(&mut self, name: &str) -> u32 {
        match self.symbols.iter().position(|symbol| symbol == name) {
            Some(index) => index as u32 + 1,
            None => self.allocate(name),
        }
    }

    /// Slot for `@name`; `name` includes the `@`.
    pub fn allocate_named(&mut self, name: &str) -> u32 {
        self.allocate_unique(name)
    }

    /// Slot for the block called `name` (`default`, `else`, `attrs`...).
    pub fn allocate_block(&mut self, name: &str) -> u32 {
        self.allocate_unique(&format!("&{name}"))
    }

    pub fn allocate_free(&mut self, name: &str) -> u32 {
        match self.upvars.iter().position(|upvar| upvar == name) {
            Some(index) => index as u32,
            None => {
                self.upvars.push(name.to_string());
                self.upvars.len() as u32 - 1
            }
        }
    }

    /// Records a use of an embedder local and returns its upvar.
    pub fn allocate_lexical(&mut self, name: &str) -> u32 {
        if !self.used_locals.iter().any(|used| used == name) {
            self.used_locals.push(name.to_string());
        }
        self.allocate_free(name)
    }

    pub fn set_has_eval(&mut self) {
        self.has_eval = true;
    }

    pub fn is_embedder_local(&self, name: &str) -> bool {
        self.embedder_locals.iter().any(|local| local == name)
    }

    /// Opens a frame declaring `params` and returns their symbols.
    pub fn push_frame(&mut self, params: &[String]) -> Vec<u32> {
        let locals: Vec<(String, u32)> = params
            .iter()
            .map(|name| (name.clone(), self.allocate(name)))
            .collect();
        let symbols = locals.iter().map(|(_, symbol)| *symbol).collect();
        self.frames.push(Frame { locals });
        symbols
    }

    pub fn pop_frame(&mut self) {
        existing(self.frames.pop(), "a scope frame to pop");
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The closest declaration of `name` as `(symbol, depth)`.
    pub fn lookup_local(&self, name: &str) -> Option<(u32, u32)> {
        self.frames
            .iter()
            .rev()
            .enumerate()
            .find_map(|(depth, frame)| {
                frame
                    .locals
                    .iter()
                    .rev()
                    .find(|(local, _)| local == name)
                    .map(|(_, symbol)| (*symbol, depth as u32))
            })
    }

    /// Every local slot currently visible, outermost first.
    pub fn visible_symbols(&self) -> Vec<u32> {
        self.frames
            .iter()
            .flat_map(|frame| frame.locals.iter().map(|(_, symbol)| *symbol))
            .collect()
    }

    pub fn finish(self) -> ProgramSymbols {
        assert!(
            self.frames.is_empty(),
            "BUG: unbalanced scope frames, {} left open",
            self.frames.len()
        );
        ProgramSymbols {
            symbols: self.symbols,
            upvars: self.upvars,
            has_eval: self.has_eval,
            used_locals: self.used_locals,
        }
    }
}
