//! Applying a rule's transformation to its match.
//!
//! ```text
//! Identity  ─▶ Emit(text)
//! Ignore    ─▶ Drop
//! Convert   ─▶ Emit(converter(text))  | Err(reason)
//! KeepIf    ─▶ Emit(keep) if text contains keep, else Drop
//! Switch    ─▶ whatever `then` gives  (the scanner performs the switch)
//! ```
//!
//! Everything here is pure; the only engine-state side effect a rule can have
//! (switching rulesets) is carried out by the scanner.

use crate::{TokenValue, Transform};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    Emit(TokenValue),
    /// The ignore sentinel: consume, produce nothing.
    Drop,
}

pub(crate) fn apply(transform: &Transform, text: &str) -> Result<Outcome, String> {
    let outcome = match transform {
        Transform::Identity => Outcome::Emit(TokenValue::from(text)),
        Transform::Switch { then, .. } => return apply(then, text),
        Transform::Ignore => Outcome::Drop,
        Transform::Convert(converter) => Outcome::Emit(converter.convert(text)?),
        Transform::KeepIf { keep } if text.contains(keep.as_str()) => Outcome::Emit(TokenValue::from(keep.as_str())),
        Transform::KeepIf { .. } => Outcome::Drop,
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Converter, SwitchTarget};

    #[test]
    fn keep_if_collapses_to_the_kept_text() {
        let keep = Transform::KeepIf { keep: "\n".into() };
        assert_eq!(apply(&keep, "  \t\n  "), Ok(Outcome::Emit(TokenValue::from("\n"))));
        assert_eq!(apply(&keep, "   "), Ok(Outcome::Drop));
    }

    #[test]
    fn switch_defers_to_its_inner_transform() {
        let switch = |then| Transform::Switch { target: SwitchTarget::Next, then: Box::new(then) };
        assert_eq!(apply(&switch(Transform::Identity), "/*"), Ok(Outcome::Emit(TokenValue::from("/*"))));
        assert_eq!(apply(&switch(Transform::Ignore), "/*"), Ok(Outcome::Drop));
        let converted = switch(Transform::Convert(Converter::integer()));
        assert_eq!(apply(&converted, "12"), Ok(Outcome::Emit(TokenValue::Int(12))));
    }

    #[test]
    fn convert_propagates_refusal() {
        let convert = Transform::Convert(Converter::integer());
        assert_eq!(apply(&convert, "-42"), Ok(Outcome::Emit(TokenValue::Int(-42))));
        assert!(apply(&convert, "--").is_err());
        assert_eq!(apply(&Transform::Ignore, "x"), Ok(Outcome::Drop));
    }
}
