#![forbid(unsafe_code)]

//! Required-field validation for forms that opt in with `data-validate`.

use crate::ui::{Effect, Target};

const ERROR_CLASS: &str = "error";

/// Mark each required field valid or not; returns whether the form may submit.
pub fn validate_required(form: usize, values: &[String], out: &mut Vec<Effect>) -> bool {
    let mut valid = true;
    for (field, value) in values.iter().enumerate() {
        let empty = value.trim().is_empty();
        valid &= !empty;
        out.push(Effect::class(
            Target::FormField { form, field },
            ERROR_CLASS,
            empty,
        ));
    }
    if !valid {
        out.push(Effect::RejectSubmit);
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_fields_are_flagged_and_submit_rejected() {
        let mut out = Vec::new();
        let ok = validate_required(0, &["Ada".into(), "   ".into()], &mut out);
        assert!(!ok);
        assert_eq!(
            out,
            vec![
                Effect::class(Target::FormField { form: 0, field: 0 }, "error", false),
                Effect::class(Target::FormField { form: 0, field: 1 }, "error", true),
                Effect::RejectSubmit,
            ]
        );
    }

    #[test]
    fn filled_form_submits() {
        let mut out = Vec::new();
        assert!(validate_required(1, &["a".into()], &mut out));
        assert!(!out.contains(&Effect::RejectSubmit));
    }
}
