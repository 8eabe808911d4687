pub mod affiliates;
pub mod invited_users_csv;
