use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

pub type Revision = u64;

/// The revision of storage that can never change.
pub const CONSTANT_REVISION: Revision = 0;
pub const INITIAL_REVISION: Revision = 1;

thread_local! {
    static REVISION: Cell<Revision> = const { Cell::new(INITIAL_REVISION) };
    static FRAMES: RefCell<Vec<Vec<Tag>>> = const { RefCell::new(Vec::new()) };
}

pub fn current_revision() -> Revision {
    REVISION.with(Cell::get)
}

fn bump() -> Revision {
    REVISION.with(|revision| {
        let next = revision.get() + 1;
        revision.set(next);
        next
    })
}

/// A validator: the last revision its storage changed at.
#[derive(Clone)]
pub struct Tag(TagKind);

#[derive(Clone)]
enum TagKind {
    Constant,
    Dirtyable(Rc<Cell<Revision>>),
    Combined(Rc<[Tag]>),
}

impl Tag {
    pub fn constant() -> Tag {
        Tag(TagKind::Constant)
    }

    pub fn dirtyable() -> Tag {
        Tag(TagKind::Dirtyable(Rc::new(Cell::new(INITIAL_REVISION))))
    }

    /// A tag that changes whenever any of `tags` does. Constant tags are
    /// dropped, so combining only constants yields a constant.
    pub fn combine(tags: impl IntoIterator<Item = Tag>) -> Tag {
        let mut tags: Vec<Tag> = tags.into_iter().filter(|tag| !tag.is_const()).collect();
        match tags.len() {
            0 => Tag::constant(),
            1 => tags.remove(0),
            _ => Tag(TagKind::Combined(tags.into())),
        }
    }

    pub fn value(&self) -> Revision {
        match &self.0 {
            TagKind::Constant => CONSTANT_REVISION,
            TagKind::Dirtyable(revision) => revision.get(),
            TagKind::Combined(tags) => tags.iter().map(Tag::value).max().unwrap_or(CONSTANT_REVISION),
        }
    }

    /// Whether nothing this tag covers changed after `snapshot`.
    pub fn validate(&self, snapshot: Revision) -> bool {
        self.value() <= snapshot
    }

    pub fn is_const(&self) -> bool {
        matches!(self.0, TagKind::Constant)
    }

    /// Records a write to the storage this tag guards.
    #[track_caller]
    pub fn dirty(&self) {
        match &self.0 {
            TagKind::Dirtyable(revision) => revision.set(bump()),
            _ => panic!("BUG: only dirtyable tags can be dirtied"),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            TagKind::Constant => f.write_str("Tag(const)"),
            TagKind::Dirtyable(revision) => write!(f, "Tag({})", revision.get()),
            TagKind::Combined(tags) => f.debug_tuple("Tag").field(tags).finish(),
        }
    }
}

/// Runs `f`, returning its result and a tag combining every tag consumed
/// while it ran.
pub fn track<T>(f: impl FnOnce() -> T) -> (T, Tag) {
    FRAMES.with(|frames| frames.borrow_mut().push(Vec::new()));
    let value = f();
    let consumed = FRAMES.with(|frames| frames.borrow_mut().pop()).unwrap_or_default();
    (value, Tag::combine(consumed))
}

/// Runs `f` without reporting its reads to the enclosing tracking frame.
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    let (value, _) = track(f);
    value
}

/// Reports a read of `tag` to the innermost tracking frame, if any.
pub fn consume(tag: &Tag) {
    if tag.is_const() {
        return;
    }
    FRAMES.with(|frames| {
        if let Some(frame) = frames.borrow_mut().last_mut() {
            frame.push(tag.clone());
        }
    });
}
