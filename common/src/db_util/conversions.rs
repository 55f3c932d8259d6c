//! Safe-ish conversions between rust and sql types.

use super::*;

pub fn i32_to_u32(i: i32) -> Result<u32> {
    u32::try_from(i).map_err(|_| anyhow!("i32 value {i} is negative and cannot be converted to u32"))
}

pub fn u32_to_i32(i: u32) -> Result<i32> {
    i32::try_from(i).map_err(|_| anyhow!("u32 value {i} exceeds i32::MAX and cannot be converted to i32"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_conversions() {
        assert_eq!(i32_to_u32(12).unwrap(), 12);
        assert!(i32_to_u32(-1).is_err());
        assert_eq!(u32_to_i32(7).unwrap(), 7);
        assert!(u32_to_i32(u32::MAX).is_err());
    }
}
