mod print;
mod table;

pub use crate::actions::display::{
    print::{
        print_bold,
        print_green,
        print_red,
        print_result,
        print_specification,
        print_yellow,
    },
    table::{DisplayTable, print_table},
};
