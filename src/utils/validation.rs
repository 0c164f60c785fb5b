use validator::{Validate, ValidationError};

pub fn validate<T: Validate>(val: &T) -> crate::error::Result<()> {
    val.validate()?;
    Ok(())
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_blank() {
        assert!(not_blank("   \n").is_err());
        assert!(not_blank(" x ").is_ok());
    }
}
