//! Diesel table definitions for the roster schema.
//!
//! These definitions must match `backend/migrations` exactly. Enumerations
//! are stored as their integer codes.

diesel::table! {
    /// Canonical groups: organisation, districts, chapters, choruses and
    /// quartets, linked into a tree by `parent_id`.
    groups (id) {
        id -> Uuid,
        name -> Varchar,
        status -> Int4,
        kind -> Nullable<Int4>,
        gender -> Int4,
        district -> Nullable<Int4>,
        division -> Nullable<Int4>,
        bhs_id -> Nullable<Int4>,
        code -> Varchar,
        website -> Varchar,
        email -> Varchar,
        phone -> Varchar,
        fax_phone -> Varchar,
        facebook -> Varchar,
        twitter -> Varchar,
        youtube -> Varchar,
        pinterest -> Varchar,
        flickr -> Varchar,
        instagram -> Varchar,
        soundcloud -> Varchar,
        visitor_information -> Text,
        start_date -> Nullable<Date>,
        end_date -> Nullable<Date>,
        location -> Varchar,
        description -> Text,
        notes -> Text,
        participants -> Varchar,
        chapters -> Varchar,
        is_senior -> Bool,
        is_youth -> Bool,
        tree_sort -> Nullable<Int4>,
        parent_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Canonical persons.
    persons (id) {
        id -> Uuid,
        status -> Int4,
        prefix -> Varchar,
        first_name -> Varchar,
        middle_name -> Varchar,
        last_name -> Varchar,
        nick_name -> Varchar,
        suffix -> Varchar,
        birth_date -> Nullable<Date>,
        spouse -> Varchar,
        location -> Varchar,
        part -> Nullable<Int4>,
        mon -> Nullable<Int4>,
        gender -> Nullable<Int4>,
        is_deceased -> Bool,
        is_honorary -> Bool,
        is_suspended -> Bool,
        is_expelled -> Bool,
        email -> Varchar,
        home_phone -> Varchar,
        work_phone -> Varchar,
        cell_phone -> Varchar,
        description -> Text,
        notes -> Text,
        bhs_id -> Nullable<Int4>,
        current_through -> Nullable<Date>,
    }
}

diesel::table! {
    /// Group membership; unique on `(group_id, person_id)`.
    members (id) {
        id -> Uuid,
        group_id -> Uuid,
        person_id -> Uuid,
        status -> Int4,
        part -> Nullable<Int4>,
        start_date -> Nullable<Date>,
        end_date -> Nullable<Date>,
    }
}

diesel::table! {
    /// Officer positions; unique on `(person_id, group_id, office)`.
    officers (id) {
        id -> Uuid,
        person_id -> Uuid,
        group_id -> Uuid,
        office -> Int4,
        status -> Int4,
        start_date -> Nullable<Date>,
        end_date -> Nullable<Date>,
    }
}

diesel::table! {
    /// User accounts keyed by unique email.
    user_accounts (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
    }
}

diesel::table! {
    group_owners (group_id, account_id) {
        group_id -> Uuid,
        account_id -> Uuid,
    }
}

diesel::table! {
    person_owners (person_id, account_id) {
        person_id -> Uuid,
        account_id -> Uuid,
    }
}

diesel::table! {
    /// Append-only status transition journal.
    state_log (id) {
        id -> Int8,
        entity -> Int4,
        entity_id -> Uuid,
        from_state -> Varchar,
        to_state -> Varchar,
        event -> Varchar,
        actor -> Nullable<Varchar>,
        description -> Nullable<Text>,
        recorded_at -> Timestamptz,
    }
}

diesel::joinable!(members -> groups (group_id));
diesel::joinable!(members -> persons (person_id));
diesel::joinable!(officers -> groups (group_id));
diesel::joinable!(officers -> persons (person_id));
diesel::joinable!(group_owners -> groups (group_id));
diesel::joinable!(group_owners -> user_accounts (account_id));
diesel::joinable!(person_owners -> persons (person_id));
diesel::joinable!(person_owners -> user_accounts (account_id));

diesel::allow_tables_to_appear_in_same_query!(
    groups,
    persons,
    members,
    officers,
    user_accounts,
    group_owners,
    person_owners,
    state_log,
);
