/// Reference sent when the caller gave no order id.
pub(crate) fn generate_reference() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_are_unique() {
        assert_ne!(generate_reference(), generate_reference());
    }
}
