// Decoding of application/x-www-form-urlencoded submission bodies.

use survey_record::Submission;

use crate::intake::BIntakeResult;

/// Decodes a captured form body into a submission.
///
/// Repeated keys accumulate in submission order; percent-escapes and `+`
/// are decoded. No key is validated here: the body shape is whatever the
/// presentation layer emits.
pub fn read_urlencoded_submission(body: &str) -> BIntakeResult<Submission> {
    let mut submission = Submission::new();
    for (name, value) in url::form_urlencoded::parse(body.trim().as_bytes()) {
        submission.push_value(&name, &value);
    }
    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_accumulate_in_order() {
        let sub = read_urlencoded_submission("clienti=RFI&clienti=Trenitalia").unwrap();
        assert_eq!(sub.list("clienti"), ["RFI", "Trenitalia"]);
    }

    #[test]
    fn escapes_are_decoded() {
        let sub =
            read_urlencoded_submission("nome=Anna+Bianchi&normative=EN+50128%2C+CENELEC&x=a%26b")
                .unwrap();
        assert_eq!(sub.first("nome"), "Anna Bianchi");
        assert_eq!(sub.first("normative"), "EN 50128, CENELEC");
        assert_eq!(sub.first("x"), "a&b");
    }

    #[test]
    fn bracketed_field_names_survive() {
        let sub = read_urlencoded_submission("linguaggi_firmware%5B%5D=C").unwrap();
        assert_eq!(sub.list("linguaggi_firmware[]"), ["C"]);
    }

    #[test]
    fn empty_bodies_yield_empty_submissions() {
        let sub = read_urlencoded_submission("\n").unwrap();
        assert_eq!(sub.first("nome"), "");
    }
}
