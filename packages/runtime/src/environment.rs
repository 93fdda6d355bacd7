use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::capabilities::Capabilities;
use crate::dom::DomOperations;

/// The DOM facade and capabilities a render runs against.
#[derive(Clone)]
pub struct Environment {
    dom: Rc<dyn DomOperations>,
    capabilities: Rc<Capabilities>,
}

impl Environment {
    pub fn new(dom: impl DomOperations + 'static, capabilities: Capabilities) -> Self {
        Environment {
            dom: Rc::new(dom),
            capabilities: Rc::new(capabilities),
        }
    }

    pub fn dom(&self) -> &Rc<dyn DomOperations> {
        &self.dom
    }

    pub fn capabilities(&self) -> &Rc<Capabilities> {
        &self.capabilities
    }

    /// Runs `f` inside a transaction. Destructors scheduled during `f` run
    /// when it returns, after every DOM write it made.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut Transaction) -> T) -> T {
        let mut tx = Transaction::default();
        let result = f(&mut tx);
        tx.commit();
        result
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

pub type Destructor = Box<dyn FnOnce()>;

/// Cleanup deferred until the surrounding [`Environment::transaction`]
/// commits.
#[derive(Default)]
pub struct Transaction {
    destructors: Vec<Destructor>,
}

impl Transaction {
    pub fn schedule(&mut self, destructor: impl FnOnce() + 'static) {
        self.destructors.push(Box::new(destructor));
    }

    pub fn schedule_all(&mut self, destructors: Vec<Destructor>) {
        self.destructors.extend(destructors);
    }

    pub fn pending(&self) -> usize {
        self.destructors.len()
    }

    fn commit(self) {
        trace!(destructors = self.destructors.len(), "committing transaction");
        for destructor in self.destructors {
            destructor();
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction").field("pending", &self.pending()).finish()
    }
}
