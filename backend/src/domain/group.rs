//! Canonical organisational unit: international root, districts, chapters,
//! choruses and quartets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coded_enum::define_coded_enum;

define_coded_enum! {
    /// Lifecycle status of a group.
    pub enum GroupStatus {
        /// Closed, revoked, suspended, merged or expired.
        Inactive = (-10, "inactive", "Inactive"),
        /// Historical champion quartet.
        Aic = (-5, "aic", "AIC"),
        /// Default for new rows.
        New = (0, "new", "New"),
        /// In good standing.
        Active = (10, "active", "Active"),
    }
}

define_coded_enum! {
    /// Organisational kind. Codes order the tree.
    pub enum GroupKind {
        /// The single international root.
        International = (1, "international", "International"),
        /// Regional district.
        District = (11, "district", "District"),
        /// Non-competitive organisation.
        Noncomp = (12, "noncomp", "Noncompetitive"),
        /// Affiliate organisation.
        Affiliate = (13, "affiliate", "Affiliate"),
        /// Local chapter.
        Chapter = (30, "chapter", "Chapter"),
        /// Chorus.
        Chorus = (32, "chorus", "Chorus"),
        /// Quartet.
        Quartet = (41, "quartet", "Quartet"),
        /// Very large quartet.
        Vlq = (46, "vlq", "VLQ"),
    }
}

define_coded_enum! {
    /// Voicing of a group.
    pub enum GroupGender {
        /// Male voices.
        Male = (10, "male", "Male"),
        /// Female voices.
        Female = (20, "female", "Female"),
        /// Mixed voices.
        Mixed = (30, "mixed", "Mixed"),
    }
}

define_coded_enum! {
    /// Regional district code.
    pub enum District {
        /// Barbershop Harmony Society.
        Bhs = (110, "bhs", "BHS"),
        /// Cardinal.
        Car = (200, "car", "CAR"),
        /// Central States.
        Csd = (205, "csd", "CSD"),
        /// Dixie.
        Dix = (210, "dix", "DIX"),
        /// Evergreen.
        Evg = (215, "evg", "EVG"),
        /// Far Western.
        Fwd = (220, "fwd", "FWD"),
        /// Illinois.
        Ill = (225, "ill", "ILL"),
        /// Johnny Appleseed.
        Jad = (230, "jad", "JAD"),
        /// Land O'Lakes.
        Lol = (235, "lol", "LOL"),
        /// Mid-Atlantic.
        Mad = (240, "mad", "MAD"),
        /// Northeastern.
        Ned = (345, "ned", "NED"),
        /// Carolinas.
        Nsc = (350, "nsc", "NSC"),
        /// Ontario.
        Ont = (355, "ont", "ONT"),
        /// Pioneer.
        Pio = (360, "pio", "PIO"),
        /// Rocky Mountain.
        Rmd = (365, "rmd", "RMD"),
        /// Seneca Land.
        Sld = (370, "sld", "SLD"),
        /// Sunshine.
        Sun = (375, "sun", "SUN"),
        /// Southwestern.
        Swd = (380, "swd", "SWD"),
    }
}

define_coded_enum! {
    /// Sub-regional division within a district.
    pub enum Division {
        /// EVG Division I.
        Evgd1 = (10, "evgd1", "EVG Division I"),
        /// EVG Division II.
        Evgd2 = (20, "evgd2", "EVG Division II"),
        /// EVG Division III.
        Evgd3 = (30, "evgd3", "EVG Division III"),
        /// EVG Division IV.
        Evgd4 = (40, "evgd4", "EVG Division IV"),
        /// EVG Division V.
        Evgd5 = (50, "evgd5", "EVG Division V"),
        /// FWD Arizona.
        Fwdaz = (60, "fwdaz", "FWD Arizona"),
        /// FWD Northeast.
        Fwdne = (70, "fwdne", "FWD Northeast"),
        /// FWD Northwest.
        Fwdnw = (80, "fwdnw", "FWD Northwest"),
        /// FWD Southeast.
        Fwdse = (90, "fwdse", "FWD Southeast"),
        /// FWD Southwest.
        Fwdsw = (100, "fwdsw", "FWD Southwest"),
        /// LOL 10000 Lakes.
        Lol10l = (110, "lol10l", "LOL 10000 Lakes"),
        /// LOL Division One.
        Lolone = (120, "lolone", "LOL Division One"),
        /// LOL Northern Plains.
        Lolnp = (130, "lolnp", "LOL Northern Plains"),
        /// LOL Packerland.
        Lolpkr = (140, "lolpkr", "LOL Packerland"),
        /// LOL Southwest.
        Lolsw = (150, "lolsw", "LOL Southwest"),
        /// MAD Central.
        Madcen = (170, "madcen", "MAD Central"),
        /// MAD Northern.
        Madnth = (180, "madnth", "MAD Northern"),
        /// MAD Southern.
        Madsth = (190, "madsth", "MAD Southern"),
        /// NED Granite and Pine.
        Nedgp = (210, "nedgp", "NED Granite and Pine"),
        /// NED Mountain.
        Nedmtn = (220, "nedmtn", "NED Mountain"),
        /// NED Patriot.
        Nedpat = (230, "nedpat", "NED Patriot"),
        /// NED Sunrise.
        Nedsun = (240, "nedsun", "NED Sunrise"),
        /// NED Yankee.
        Nedyke = (250, "nedyke", "NED Yankee"),
        /// SWD Northeast.
        Swdne = (260, "swdne", "SWD Northeast"),
        /// SWD Northwest.
        Swdnw = (270, "swdnw", "SWD Northwest"),
        /// SWD Southeast.
        Swdse = (280, "swdse", "SWD Southeast"),
        /// SWD Southwest.
        Swdsw = (290, "swdsw", "SWD Southwest"),
    }
}

/// Contact and social-media fields. Every value is already validated;
/// invalid input is stored as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupContact {
    /// Website URL.
    pub website: String,
    /// Contact email.
    pub email: String,
    /// Main phone in E.164 form.
    pub phone: String,
    /// Fax phone in E.164 form.
    pub fax_phone: String,
    /// Facebook URL.
    pub facebook: String,
    /// Twitter URL.
    pub twitter: String,
    /// YouTube URL.
    pub youtube: String,
    /// Pinterest URL.
    pub pinterest: String,
    /// Flickr URL.
    pub flickr: String,
    /// Instagram URL.
    pub instagram: String,
    /// SoundCloud URL.
    pub soundcloud: String,
}

/// Fields owned by the group reconciler.
///
/// Staff-curated fields (free text, `is_senior`, `is_youth`) and `tree_sort`
/// are absent: an upsert never touches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpsert {
    /// Internal id, shared 1:1 with the source structure id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: GroupStatus,
    /// Kind; `None` when the source token is unknown.
    pub kind: Option<GroupKind>,
    /// Voicing.
    pub gender: GroupGender,
    /// District derived from the parent chain.
    pub district: Option<District>,
    /// Division from the source token.
    pub division: Option<Division>,
    /// External numeric id.
    pub bhs_id: Option<i32>,
    /// Legacy chapter code.
    pub code: String,
    /// Contact fields.
    pub contact: GroupContact,
    /// Visitor information.
    pub visitor_information: String,
    /// Established date.
    pub start_date: Option<NaiveDate>,
    /// Parent group, when resolvable.
    pub parent_id: Option<Uuid>,
}

/// Persisted group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Internal id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: GroupStatus,
    /// Kind.
    pub kind: Option<GroupKind>,
    /// Voicing.
    pub gender: GroupGender,
    /// District.
    pub district: Option<District>,
    /// Division.
    pub division: Option<Division>,
    /// External numeric id.
    pub bhs_id: Option<i32>,
    /// Legacy chapter code.
    pub code: String,
    /// Contact fields.
    pub contact: GroupContact,
    /// Visitor information.
    pub visitor_information: String,
    /// Established date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
    /// Staff-curated location.
    pub location: String,
    /// Staff-curated description.
    pub description: String,
    /// Staff-curated notes.
    pub notes: String,
    /// Staff-curated participant list.
    pub participants: String,
    /// Staff-curated chapter names.
    pub chapters: String,
    /// Senior quartet designation.
    pub is_senior: bool,
    /// Youth group designation.
    pub is_youth: bool,
    /// Display order computed by the tree sort.
    pub tree_sort: Option<i32>,
    /// Parent group.
    pub parent_id: Option<Uuid>,
}

impl Group {
    /// Build a freshly inserted group from an upsert payload.
    pub fn from_upsert(upsert: GroupUpsert) -> Self {
        Self {
            id: upsert.id,
            name: upsert.name,
            status: upsert.status,
            kind: upsert.kind,
            gender: upsert.gender,
            district: upsert.district,
            division: upsert.division,
            bhs_id: upsert.bhs_id,
            code: upsert.code,
            contact: upsert.contact,
            visitor_information: upsert.visitor_information,
            start_date: upsert.start_date,
            end_date: None,
            location: String::new(),
            description: String::new(),
            notes: String::new(),
            participants: String::new(),
            chapters: String::new(),
            is_senior: false,
            is_youth: false,
            tree_sort: None,
            parent_id: upsert.parent_id,
        }
    }

    /// Overwrite the reconciler-owned fields, leaving curated ones intact.
    pub fn apply_upsert(&mut self, upsert: GroupUpsert) {
        self.name = upsert.name;
        self.status = upsert.status;
        self.kind = upsert.kind;
        self.gender = upsert.gender;
        self.district = upsert.district;
        self.division = upsert.division;
        self.bhs_id = upsert.bhs_id;
        self.code = upsert.code;
        self.contact = upsert.contact;
        self.visitor_information = upsert.visitor_information;
        self.start_date = upsert.start_date;
        self.parent_id = upsert.parent_id;
    }

    /// Operator-facing label: `name (code) [bhs_id]`.
    ///
    /// # Examples
    /// ```
    /// use roster_backend::domain::{Group, GroupUpsert};
    /// # use roster_backend::domain::{GroupContact, GroupGender, GroupStatus};
    /// # let upsert = GroupUpsert {
    /// #     id: uuid::Uuid::nil(), name: "Gas House Gang".into(), status: GroupStatus::Aic,
    /// #     kind: None, gender: GroupGender::Male, district: None, division: None,
    /// #     bhs_id: Some(1259), code: String::new(), contact: GroupContact::default(),
    /// #     visitor_information: String::new(), start_date: None, parent_id: None,
    /// # };
    /// let group = Group::from_upsert(upsert);
    /// assert_eq!(group.nomen(), "Gas House Gang [1259]");
    /// ```
    pub fn nomen(&self) -> String {
        let suffix = match self.bhs_id {
            Some(bhs_id) => format!("[{bhs_id}]"),
            None => "[No BHS ID]".to_owned(),
        };
        let code = if self.code.is_empty() {
            String::new()
        } else {
            format!("({})", self.code)
        };
        [self.name.as_str(), code.as_str(), suffix.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether this group is the organisation's root membership group.
    pub fn is_root_organisation(&self) -> bool {
        self.bhs_id == Some(1)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn group(code: &str, bhs_id: Option<i32>) -> Group {
        Group::from_upsert(GroupUpsert {
            id: Uuid::nil(),
            name: "Downtown".to_owned(),
            status: GroupStatus::Active,
            kind: Some(GroupKind::Chorus),
            gender: GroupGender::Male,
            district: None,
            division: None,
            bhs_id,
            code: code.to_owned(),
            contact: GroupContact::default(),
            visitor_information: String::new(),
            start_date: None,
            parent_id: None,
        })
    }

    #[rstest]
    #[case("J123", Some(42), "Downtown (J123) [42]")]
    #[case("", Some(42), "Downtown [42]")]
    #[case("J123", None, "Downtown (J123) [No BHS ID]")]
    fn nomen_combines_name_code_and_id(
        #[case] code: &str,
        #[case] bhs_id: Option<i32>,
        #[case] expected: &str,
    ) {
        assert_eq!(group(code, bhs_id).nomen(), expected);
    }

    #[rstest]
    fn apply_upsert_keeps_curated_fields() {
        let mut existing = group("J123", Some(42));
        existing.notes = "rehearses Tuesdays".to_owned();
        existing.is_senior = true;
        existing.tree_sort = Some(7);

        let mut incoming = GroupUpsert {
            id: existing.id,
            name: "Uptown".to_owned(),
            status: GroupStatus::Inactive,
            kind: Some(GroupKind::Chorus),
            gender: GroupGender::Mixed,
            district: Some(District::Fwd),
            division: None,
            bhs_id: Some(42),
            code: "J123".to_owned(),
            contact: GroupContact::default(),
            visitor_information: String::new(),
            start_date: None,
            parent_id: None,
        };
        incoming.contact.website = "https://uptown.example".to_owned();
        existing.apply_upsert(incoming);

        assert_eq!(existing.name, "Uptown");
        assert_eq!(existing.notes, "rehearses Tuesdays");
        assert!(existing.is_senior);
        assert_eq!(existing.tree_sort, Some(7));
        assert_eq!(existing.contact.website, "https://uptown.example");
    }

    #[rstest]
    fn kind_codes_follow_tree_order() {
        let codes: Vec<i32> = GroupKind::ALL.iter().map(GroupKind::code).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }
}
