//! Collision-free copy names.

use folio_types::path;

fn copy_label(n: usize) -> String {
    if n == 1 {
        "(copy)".to_string()
    } else {
        format!("(copy {n})")
    }
}

/// The `n`-th copy name of `name`: `base (copy).ext`, `base (copy 2).ext`…
///
/// Folders keep their whole name as the base.
pub fn copy_name(name: &str, is_folder: bool, n: usize) -> String {
    let label = copy_label(n);
    if is_folder {
        return format!("{name} {label}");
    }
    match path::split_extension(name) {
        (stem, Some(ext)) => format!("{stem} {label}.{ext}"),
        (stem, None) => format!("{stem} {label}"),
    }
}

/// First copy name of `name` for which `taken` is false.
///
/// Always terminates as long as `taken` holds for finitely many names.
pub fn unique_name(name: &str, is_folder: bool, taken: impl Fn(&str) -> bool) -> String {
    if !taken(name) {
        return name.to_string();
    }
    (1..)
        .map(|n| copy_name(name, is_folder, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(copy_name("notes.md", false, 1), "notes (copy).md");
        assert_eq!(copy_name("notes.md", false, 2), "notes (copy 2).md");
        assert_eq!(copy_name("README", false, 1), "README (copy)");
        assert_eq!(copy_name(".env", false, 1), ".env (copy)");
        assert_eq!(copy_name("notes.d", true, 1), "notes.d (copy)");
    }

    #[test]
    fn probes_until_free() {
        let taken: HashSet<&str> = ["a.md", "a (copy).md", "a (copy 2).md"].into_iter().collect();
        assert_eq!(unique_name("a.md", false, |n| taken.contains(n)), "a (copy 3).md");
        assert_eq!(unique_name("b.md", false, |n| taken.contains(n)), "b.md");
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        proptest! {
            #[test]
            fn chosen_name_is_unused(
                name in "[a-z]{1,6}(\\.[a-z]{1,3})?",
                copies in 0usize..8,
            ) {
                let mut taken: HashSet<String> = HashSet::new();
                taken.insert(name.clone());
                for n in 1..=copies {
                    taken.insert(copy_name(&name, false, n));
                }
                let chosen = unique_name(&name, false, |c| taken.contains(c));
                prop_assert!(!taken.contains(&chosen));
            }
        }
    }
}
