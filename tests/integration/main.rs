mod descriptor_tests;
mod manager_tests;
