/*!
 * Provider request and response tests
 */

pub mod openai_test;
