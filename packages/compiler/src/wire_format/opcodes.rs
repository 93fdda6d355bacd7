//! Opcode numbers of the wire format.
//!
//! The numbers are part of the persisted format: templates compiled by one
//! version are read by another, so existing values never change.

use serde::{Deserialize, Serialize};

use crate::v2::FreeVarResolution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Op {
    // Statements
    Append = 1,
    TrustingAppend = 2,
    Comment = 3,
    Modifier = 4,
    StrictModifier = 5,
    Block = 6,
    StrictBlock = 7,
    Component = 8,
    OpenElement = 10,
    OpenElementWithSplat = 11,
    FlushElement = 12,
    CloseElement = 13,
    StaticAttr = 14,
    DynamicAttr = 15,
    ComponentAttr = 16,
    AttrSplat = 17,
    Yield = 18,
    DynamicArg = 20,
    StaticArg = 21,
    TrustingDynamicAttr = 22,
    TrustingComponentAttr = 23,
    StaticComponentAttr = 24,
    Debugger = 26,

    // Expressions
    Undefined = 27,
    Call = 28,
    Concat = 29,

    // Lookups
    GetSymbol = 30,
    GetStrictFree = 31,
    GetLexicalSymbol = 32,
    GetFreeAsComponentOrHelperHeadOrThisFallback = 34,
    GetFreeAsComponentOrHelperHead = 35,
    GetFreeAsHelperHeadOrThisFallback = 36,
    GetFreeAsHelperHead = 37,
    GetFreeAsModifierHead = 38,
    GetFreeAsComponentHead = 39,

    // Keywords
    InElement = 40,
    If = 41,
    Each = 42,
    With = 43,
    Let = 44,
    WithDynamicVars = 45,
    InvokeComponent = 46,
    HasBlock = 48,
    HasBlockParams = 49,
    Curry = 50,
    Not = 51,
    IfInline = 52,
    GetDynamicVar = 53,
    Log = 54,

    GetFreeAsDeprecatedHelperHeadOrThisFallback = 99,
}

const ALL: &[Op] = &[
    Op::Append,
    Op::TrustingAppend,
    Op::Comment,
    Op::Modifier,
    Op::StrictModifier,
    Op::Block,
    Op::StrictBlock,
    Op::Component,
    Op::OpenElement,
    Op::OpenElementWithSplat,
    Op::FlushElement,
    Op::CloseElement,
    Op::StaticAttr,
    Op::DynamicAttr,
    Op::ComponentAttr,
    Op::AttrSplat,
    Op::Yield,
    Op::DynamicArg,
    Op::StaticArg,
    Op::TrustingDynamicAttr,
    Op::TrustingComponentAttr,
    Op::StaticComponentAttr,
    Op::Debugger,
    Op::Undefined,
    Op::Call,
    Op::Concat,
    Op::GetSymbol,
    Op::GetStrictFree,
    Op::GetLexicalSymbol,
    Op::GetFreeAsComponentOrHelperHeadOrThisFallback,
    Op::GetFreeAsComponentOrHelperHead,
    Op::GetFreeAsHelperHeadOrThisFallback,
    Op::GetFreeAsHelperHead,
    Op::GetFreeAsModifierHead,
    Op::GetFreeAsComponentHead,
    Op::InElement,
    Op::If,
    Op::Each,
    Op::With,
    Op::Let,
    Op::WithDynamicVars,
    Op::InvokeComponent,
    Op::HasBlock,
    Op::HasBlockParams,
    Op::Curry,
    Op::Not,
    Op::IfInline,
    Op::GetDynamicVar,
    Op::Log,
    Op::GetFreeAsDeprecatedHelperHeadOrThisFallback,
];

impl Op {
    pub fn from_code(code: u64) -> Option<Op> {
        ALL.iter().copied().find(|op| *op as u64 == code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// The lookup opcode for a free variable resolved with `resolution`.
    pub fn for_free_var(resolution: FreeVarResolution) -> Op {
        match resolution {
            FreeVarResolution::Strict => Op::GetStrictFree,
            FreeVarResolution::ComponentOrHelperOrThisFallback => Op::GetFreeAsComponentOrHelperHeadOrThisFallback,
            FreeVarResolution::ComponentOrHelper => Op::GetFreeAsComponentOrHelperHead,
            FreeVarResolution::HelperOrThisFallback => Op::GetFreeAsHelperHeadOrThisFallback,
            FreeVarResolution::Helper => Op::GetFreeAsHelperHead,
            FreeVarResolution::Modifier => Op::GetFreeAsModifierHead,
            FreeVarResolution::Component => Op::GetFreeAsComponentHead,
            FreeVarResolution::DeprecatedHelperOrThisFallback => Op::GetFreeAsDeprecatedHelperHeadOrThisFallback,
        }
    }

    /// Inverse of [`Op::for_free_var`].
    pub fn free_var_resolution(self) -> Option<FreeVarResolution> {
        Some(match self {
            Op::GetStrictFree => FreeVarResolution::Strict,
            Op::GetFreeAsComponentOrHelperHeadOrThisFallback => FreeVarResolution::ComponentOrHelperOrThisFallback,
            Op::GetFreeAsComponentOrHelperHead => FreeVarResolution::ComponentOrHelper,
            Op::GetFreeAsHelperHeadOrThisFallback => FreeVarResolution::HelperOrThisFallback,
            Op::GetFreeAsHelperHead => FreeVarResolution::Helper,
            Op::GetFreeAsModifierHead => FreeVarResolution::Modifier,
            Op::GetFreeAsComponentHead => FreeVarResolution::Component,
            Op::GetFreeAsDeprecatedHelperHeadOrThisFallback => FreeVarResolution::DeprecatedHelperOrThisFallback,
            _ => return None,
        })
    }
}
