/// Renders `count` schema parameters as `?x ?y ...`.
pub fn build_var_string(count: usize) -> String {
    let unnamed_objects = ["x", "y", "z", "p", "q", "j", "k", "t"];
    let first = unnamed_objects.iter().take(count.min(1)).fold(String::new(), |acc, item| acc + "?" + *item);
    unnamed_objects.iter().take(count).skip(1).fold(first, |acc, item| acc + " ?" + *item)
}

pub fn join<T: std::fmt::Display>(items: &[T], separator: &str) -> String {
    let first = items.iter().take(1).fold(String::new(), |acc, item| acc + &format!("{}", item));
    items.iter().skip(1).fold(first, |acc, item| acc + separator + &format!("{}", item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_string() {
        assert_eq!(build_var_string(0), "");
        assert_eq!(build_var_string(1), "?x");
        assert_eq!(build_var_string(3), "?x ?y ?z");
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&["C1", "SFO"], ", "), "C1, SFO");
        assert_eq!(join::<&str>(&[], ", "), "");
    }
}
