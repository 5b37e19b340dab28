//! The fixed question set asked of every society.
//!
//! Each question has a stable identity (`QuestionKey`), a literal template
//! containing the `society_name` placeholder, and a short display alias.
//! The persisted report uses the literal templates as column headers, so the
//! templates double as the on-disk column names; the aliases are
//! presentation-only and never written back.

/// Placeholder token substituted with the society's display name.
pub const PLACEHOLDER: &str = "society_name";

/// Stable identity for each question in the set.
///
/// Declared in presentation order. Identity deliberately does not depend on
/// the template wording: rewording a prompt must not orphan a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QuestionKey {
    MembershipCount,
    CommunitySites,
    PolicyInfluence,
    LeadershipEngagement,
    ClinicalTrialSupport,
    PayorEngagement,
    BoardExperts,
    TherapeuticResearch,
    TopExperts,
    Region,
}

impl QuestionKey {
    /// All questions, in presentation and persistence order.
    pub const ALL: [QuestionKey; 10] = [
        QuestionKey::MembershipCount,
        QuestionKey::CommunitySites,
        QuestionKey::PolicyInfluence,
        QuestionKey::LeadershipEngagement,
        QuestionKey::ClinicalTrialSupport,
        QuestionKey::PayorEngagement,
        QuestionKey::BoardExperts,
        QuestionKey::TherapeuticResearch,
        QuestionKey::TopExperts,
        QuestionKey::Region,
    ];

    /// The literal question template, with the placeholder unsubstituted.
    ///
    /// These strings are also the persisted column headers, so they must not
    /// change without migrating the stored report.
    pub fn template(&self) -> &'static str {
        match self {
            QuestionKey::MembershipCount => {
                "What is the membership count for society_name? Respond with one word (number) only. That should just be an integer nothing like approx or members just a number."
            }
            QuestionKey::CommunitySites => {
                "Does society_name encompasses community sites? Respond one word ('yes' or 'no') only plus provide a justification for the answer also after a comma."
            }
            QuestionKey::PolicyInfluence => {
                "Is society_name influential on state or local policy? Respond one word ('yes' or 'no') only plus provide a justification for the answer also after a comma."
            }
            QuestionKey::LeadershipEngagement => {
                "Does society_name provide engagement opportunity with leadership? Respond one word ('yes' or 'no') only plus provide a justification for the answer also after a comma."
            }
            QuestionKey::ClinicalTrialSupport => {
                "Does society_name provide support for clinical trial recruitment? Respond one word ('yes' or 'no') only plus provide a justification for the answer also after a comma."
            }
            QuestionKey::PayorEngagement => {
                "Does society_name provide engagement opportunity with payors? Respond one word ('yes' or 'no') only plus provide a justification for the answer also after a comma."
            }
            QuestionKey::BoardExperts => {
                "Does society_name include area experts on its board? Respond one word ('yes' or 'no') only plus provide a justification for the answer also after a comma."
            }
            QuestionKey::TherapeuticResearch => {
                "Is society_name involved in therapeutic research collaborations? Respond one word ('yes' or 'no') only plus provide a justification for the answer also after a comma."
            }
            QuestionKey::TopExperts => {
                "Does society_name include top therapeutic area experts on its board? Respond with one word ('yes' or 'no') only plus provide a justification for the answer also after a comma."
            }
            QuestionKey::Region => {
                "Name the Region where the society_name is from? Just name the Region in word for the answer."
            }
        }
    }

    /// Short column label for display (tables, email digest).
    pub fn alias(&self) -> &'static str {
        match self {
            QuestionKey::MembershipCount => "Membership Count",
            QuestionKey::CommunitySites => "Community Sites",
            QuestionKey::PolicyInfluence => "Policy Influence",
            QuestionKey::LeadershipEngagement => "Leadership Engagement",
            QuestionKey::ClinicalTrialSupport => "Clinical Trial Support",
            QuestionKey::PayorEngagement => "Payor Engagement",
            QuestionKey::BoardExperts => "Board Experts",
            QuestionKey::TherapeuticResearch => "Therapeutic Research",
            QuestionKey::TopExperts => "Top Experts",
            QuestionKey::Region => "Region",
        }
    }

    /// Reverse lookup from a persisted column header.
    pub fn from_template(text: &str) -> Option<QuestionKey> {
        Self::ALL.iter().copied().find(|key| key.template() == text)
    }

    /// Instantiate the template for a concrete society.
    pub fn instantiate(&self, society: &str) -> String {
        self.template().replace(PLACEHOLDER, society)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_contain_placeholder() {
        for key in QuestionKey::ALL {
            assert!(
                key.template().contains(PLACEHOLDER),
                "{:?} template lacks placeholder",
                key
            );
        }
    }

    #[test]
    fn test_instantiate_substitutes_society() {
        let question = QuestionKey::MembershipCount.instantiate("FLASCO");
        assert!(question.starts_with("What is the membership count for FLASCO?"));
        assert!(!question.contains(PLACEHOLDER));
    }

    #[test]
    fn test_from_template_round_trips() {
        for key in QuestionKey::ALL {
            assert_eq!(QuestionKey::from_template(key.template()), Some(key));
        }
        assert_eq!(QuestionKey::from_template("not a question"), None);
    }

    #[test]
    fn test_aliases_are_unique() {
        let mut aliases: Vec<_> = QuestionKey::ALL.iter().map(|k| k.alias()).collect();
        aliases.sort();
        aliases.dedup();
        assert_eq!(aliases.len(), QuestionKey::ALL.len());
    }
}
