pub mod html;
#[cfg(test)]
pub mod test_utils;
pub mod url;
