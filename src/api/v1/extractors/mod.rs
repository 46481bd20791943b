/**
 * Responsibility
 *  - extractor を束ね、handlers へ公開する型を制御する
 */
mod bearer_token;

pub use bearer_token::BearerHeader;
