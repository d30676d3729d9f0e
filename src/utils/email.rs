/// Normalise un email avant toute recherche ou insertion:
/// trim, suppression d'UN point final, minuscules.
/// La même normalisation est appliquée partout (register, login,
/// reset, subscriptions) pour que "Ann.X@Mail.com." == "ann.x@mail.com".
pub fn normalize_email(email: &str) -> String {
    let trimmed = email.trim();
    let without_trailing_dot = trimmed.strip_suffix('.').unwrap_or(trimmed);
    without_trailing_dot.to_lowercase()
}

/// Vérification de forme volontairement permissive (pas un validateur RFC):
/// partie locale non vide sans espace ni '@', un '@', puis un domaine
/// contenant un point (pas en première position) suivi d'au moins
/// 2 caractères. Le texte avant et après ce point peut lui-même contenir
/// des points: "a@b.c.d" et même "a@b..c" passent.
/// Sert à attraper les fautes de frappe évidentes, rien de plus.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.contains('@') || domain.chars().any(char::is_whitespace) {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && domain[i + 1..].chars().count() >= 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("Ann.X@Mail.com."), "ann.x@mail.com");
        assert_eq!(normalize_email("  BOB@EXAMPLE.ORG  "), "bob@example.org");
        assert_eq!(normalize_email("plain@mail.com"), "plain@mail.com");
        // un seul point final est retiré
        assert_eq!(normalize_email("a@b.com.."), "a@b.com.");
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("ann.x@mail.com"));
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("user+tag@sub.domain.org"));
    }

    #[test]
    fn test_multidot_domains_stay_accepted() {
        // La permissivité fait partie du contrat: ne pas la "corriger"
        assert!(is_valid_email("a@b.c.d"));
        assert!(is_valid_email("a@b.cd.e"));
        assert!(is_valid_email("a@b..c"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@mail.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a@b.c")); // moins de 2 caractères après le point
        assert!(!is_valid_email("a@.bc")); // point en première position seulement
        assert!(!is_valid_email("a b@mail.com"));
        assert!(!is_valid_email("a@b@mail.com"));
    }
}
