diesel::table! {
    drawings (draw_date) {
        draw_date -> Date,
        ball1 -> Integer,
        ball2 -> Integer,
        ball3 -> Integer,
        ball4 -> Integer,
        ball5 -> Integer,
        ball6 -> Integer,
        bonus1 -> Integer,
        bonus2 -> Integer,
        created_time -> Timestamp,
    }
}

diesel::table! {
    ledger (id) {
        id -> Integer,
        generated_at -> Text,
        owner -> Text,
        ball1 -> Nullable<Integer>,
        ball2 -> Nullable<Integer>,
        ball3 -> Nullable<Integer>,
        ball4 -> Nullable<Integer>,
        ball5 -> Nullable<Integer>,
        ball6 -> Nullable<Integer>,
        bonus1 -> Nullable<Integer>,
        bonus2 -> Nullable<Integer>,
        total -> Nullable<Integer>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(drawings, ledger,);
