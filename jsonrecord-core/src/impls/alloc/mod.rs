mod boxed;
mod btree;
mod string;
mod vec;
