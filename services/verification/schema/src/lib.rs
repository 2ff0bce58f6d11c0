pub mod verification_codes;
