pub mod mark_absentees;
