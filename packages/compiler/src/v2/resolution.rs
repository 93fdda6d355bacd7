//! How a free variable is looked up at runtime.
//!
//! Loose mode cannot know whether `{{foo}}` names a helper, a component or a
//! property of `this`. The answer depends on where the name appears and is
//! decided once here, then carried unchanged to the wire format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreeVarResolution {
    Strict,
    ComponentOrHelperOrThisFallback,
    ComponentOrHelper,
    HelperOrThisFallback,
    Helper,
    Modifier,
    Component,
    DeprecatedHelperOrThisFallback,
}

impl FreeVarResolution {
    /// Whether an unresolved name falls back to a property of `this`.
    pub fn falls_back_to_this(self) -> bool {
        matches!(
            self,
            FreeVarResolution::ComponentOrHelperOrThisFallback
                | FreeVarResolution::HelperOrThisFallback
                | FreeVarResolution::DeprecatedHelperOrThisFallback
        )
    }

    pub fn allows_helper(self) -> bool {
        !matches!(
            self,
            FreeVarResolution::Modifier | FreeVarResolution::Component | FreeVarResolution::Strict
        )
    }

    pub fn allows_component(self) -> bool {
        matches!(
            self,
            FreeVarResolution::ComponentOrHelperOrThisFallback
                | FreeVarResolution::ComponentOrHelper
                | FreeVarResolution::Component
        )
    }
}

/// Where a name appears in the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPosition {
    /// `{{x}}` in content.
    Append,
    /// `{{#x}}`.
    Block,
    /// `attr={{x}}` or a part of `attr="a {{x}}"`.
    Attribute,
    /// `(x ...)`.
    SubExpression,
    /// `<div {{x}}>`.
    Modifier,
    /// `@arg={{x}}` on a component.
    ComponentArgument,
    /// `<X>`.
    ComponentTag,
    /// A positional or named argument of another call.
    Argument,
}

impl CallPosition {
    /// The loose mode resolution for a free name in this position. `None`
    /// means the name is read from `this` instead.
    pub fn loose_resolution(self, has_args: bool) -> Option<FreeVarResolution> {
        use FreeVarResolution::*;
        Some(match (self, has_args) {
            (CallPosition::Append, false) => ComponentOrHelperOrThisFallback,
            (CallPosition::Append, true) => ComponentOrHelper,
            (CallPosition::Block, _) => Component,
            (CallPosition::Attribute, false) => HelperOrThisFallback,
            (CallPosition::Attribute, true) => Helper,
            (CallPosition::SubExpression, _) => Helper,
            (CallPosition::Modifier, _) => Modifier,
            (CallPosition::ComponentArgument, false) => DeprecatedHelperOrThisFallback,
            (CallPosition::ComponentArgument, true) => Helper,
            (CallPosition::ComponentTag, _) => Component,
            (CallPosition::Argument, _) => return None,
        })
    }
}
